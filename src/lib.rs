//! Folio - Generate Quarto documentation books from JSDoc comments
//!
//! Extracts `/** ... */` comments from JavaScript and TypeScript sources,
//! links each one to the declaration that follows it, and writes the
//! result as a Quarto book.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod parser;
pub mod source;

// Re-export main types
pub use analysis::{AnalysisResult, Analyzer, Category, ModuleDoc};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{QuartoConfig, QuartoWriter};
pub use parser::{Comment, CommentExtractor, SourceLocation};
pub use source::{ConstructClassifier, ConstructInfo, ConstructKind, ConstructLinker, LinkedConstruct, SourceFile};
