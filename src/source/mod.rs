// Comment-to-construct linking: window loading, classification, linking

pub mod classify;
pub mod link;
pub mod window;

pub use classify::{
    ClassRule, ConstructClassifier, ConstructInfo, ConstructKind, ConstructRule, FunctionRule,
    ModuleRule, VariableRule,
};
pub use link::{ConstructLinker, LinkedConstruct, NO_CONSTRUCT};
pub use window::{LineWindow, SourceFile};
