// Output generation module

pub mod quarto;
pub mod templates;

pub use quarto::*;
pub use templates::*;
