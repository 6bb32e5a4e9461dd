// Parser module for extracting documentation comments from source files

pub mod comment;
mod javascript;

pub use comment::*;
pub use javascript::{CommentExtractor, JsVariant};
