// Construct classification from a window of raw source text
//
// Each kind has its own rule; the classifier tries them in a fixed order and
// the first rule that matches both decides the kind and supplies the name.
// Matching is purely textual: the window is the following lines joined with
// no separator.

use crate::error::Result;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a documented declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructKind {
    Function,
    Class,
    Variable,
    Module,
    Other,
}

impl ConstructKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructKind::Function => "function",
            ConstructKind::Class => "class",
            ConstructKind::Variable => "variable",
            ConstructKind::Module => "module",
            ConstructKind::Other => "other",
        }
    }

    /// Heading label used in rendered docs
    pub fn title(&self) -> &'static str {
        match self {
            ConstructKind::Function => "Function",
            ConstructKind::Class => "Class",
            ConstructKind::Variable => "Variable",
            ConstructKind::Module => "Module",
            ConstructKind::Other => "Other",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind and (when recoverable) name of the construct after a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructInfo {
    #[serde(rename = "type")]
    pub kind: ConstructKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConstructInfo {
    pub fn new(kind: ConstructKind, name: Option<String>) -> Self {
        // `other` never carries a name
        let name = if kind == ConstructKind::Other { None } else { name };
        Self { kind, name }
    }

    pub fn other() -> Self {
        Self::new(ConstructKind::Other, None)
    }

    pub fn is_other(&self) -> bool {
        self.kind == ConstructKind::Other
    }
}

/// One kind's matcher
pub trait ConstructRule: Send + Sync {
    /// The kind this rule assigns
    fn kind(&self) -> ConstructKind;

    /// Whether the window text looks like this kind of construct
    fn matches(&self, text: &str) -> bool;

    /// Declared identifier, only meaningful once `matches` holds
    fn name(&self, text: &str) -> Option<String>;

    fn try_match(&self, text: &str) -> Option<ConstructInfo> {
        if self.matches(text) {
            Some(ConstructInfo::new(self.kind(), self.name(text)))
        } else {
            None
        }
    }
}

// Function-shaped text. Checked before everything else: assignments of arrows
// and function expressions also look like variable declarations.
const FUNCTION_FORMS: &[&str] = &[
    r"(\basync\s+)?\bfunction\b",
    r"^exports\.\w+\s*=\s*async\s*\(.*\)\s*=>",
    r"\bconst\b\s*\w+\s*=\s*async\s*\(.*\)\s*=>",
    r"\b\w+\s*=\s*function\s*\(",
    r"\b\w+\s*=\s*\([\s\S]*?\)\s*=>",
    r"\b\w+\s*=\s*async\s*\([\s\S]*?\)\s*=>",
    r"\b\w+\s*=\s*function\s*[\s\S]*?\(",
];

// Name captures for function-shaped text. Group 1 is the optional `async `
// prefix; names and parameter lists start at group 2.
const FUNCTION_NAME_FORMS: &[&str] = &[
    r"(async\s+)?function\s+(\w+)",
    r"const\s+(\w+)\s*=\s*async\s*\(.*\)\s*=>",
    r"\(([\s\S]*?)\)\s*=>",
    r"(\w+)\s*=\s*function\s*\(([\s\S]*?)\)",
    r"(\w+)\s*=\s*\(([\s\S]*?)\)\s*=>",
    r"\w+\s*=\s*async\s*\(([\s\S]*?)\)\s*=>",
    r"\w+\s*=\s*function\s*[\s\S]*?\((([\s\S]*?))\)",
    r"\w+\s*=\s*\(([\s\S]*?)\)\s*=>",
];

// `exports.<name> = function (..)`, `= (..) =>`, `= async (..) =>`
const EXPORT_FORMS: &[&str] = &[
    r"^exports\.(\w+)\s*=\s*function\s*\(.*\)",
    r"exports.(\w+)\s*=\s*\([\s\S]*?\)\s*=>",
    r"exports.(\w+)\s*=\s*async\s*\([\s\S]*?\)\s*=>",
];

const ARROW_PARAMS: &str = r"\(([\s\S]*?)\)\s*=>";
const MODULE_TAG: &str = r"@module\s+(.*)";
const VARIABLE_DECL: &str = r"\b(const|let|var)\s+(\w+)";
const CLASS_DECL: &str = r"\bclass\s+(\w+)";

/// Identifiers and word boundaries are ASCII-only; `\s` stays Unicode-aware
fn compile(pattern: &str) -> Result<Regex> {
    let ascii = pattern
        .replace(r"\w", "[0-9A-Za-z_]")
        .replace(r"\b", r"(?-u:\b)");
    Ok(Regex::new(&ascii)?)
}

fn alternation(forms: &[&str]) -> Result<Regex> {
    compile(&forms.join("|"))
}

/// First participating group at or after `from`; an empty capture counts as no name
fn first_capture(caps: &Captures<'_>, from: usize) -> Option<String> {
    caps.iter()
        .skip(from)
        .flatten()
        .next()
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Matches `exports.<name> = ...` function assignments
#[derive(Debug, Clone)]
struct ExportAssignment {
    pattern: Regex,
}

impl ExportAssignment {
    fn new() -> Result<Self> {
        Ok(Self {
            pattern: alternation(EXPORT_FORMS)?,
        })
    }

    fn name(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| first_capture(&caps, 1))
    }
}

/// Function declarations, function expressions and arrows
#[derive(Debug, Clone)]
pub struct FunctionRule {
    detect: Regex,
    names: Regex,
    exports: ExportAssignment,
    arrow: Regex,
    arrow_params_as_name: bool,
}

impl FunctionRule {
    pub fn new(arrow_params_as_name: bool) -> Result<Self> {
        Ok(Self {
            detect: alternation(FUNCTION_FORMS)?,
            names: alternation(FUNCTION_NAME_FORMS)?,
            exports: ExportAssignment::new()?,
            arrow: compile(ARROW_PARAMS)?,
            arrow_params_as_name,
        })
    }
}

impl ConstructRule for FunctionRule {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Function
    }

    fn matches(&self, text: &str) -> bool {
        self.detect.is_match(text)
    }

    fn name(&self, text: &str) -> Option<String> {
        let caps = self.names.captures(text)?;
        let declared = first_capture(&caps, 2);

        if let Some(exported) = self.exports.name(text) {
            return Some(exported);
        }

        if self.arrow_params_as_name {
            // An arrow's parameter list stands in for the name, even when a
            // declared identifier exists; `()` yields no name at all.
            if let Some(arrow) = self.arrow.captures(text) {
                return arrow
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
            }
        }

        declared
    }
}

/// Text carrying an `@module <name>` tag
#[derive(Debug, Clone)]
pub struct ModuleRule {
    tag: Regex,
    exports: ExportAssignment,
}

impl ModuleRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tag: compile(MODULE_TAG)?,
            exports: ExportAssignment::new()?,
        })
    }
}

impl ConstructRule for ModuleRule {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Module
    }

    fn matches(&self, text: &str) -> bool {
        self.tag.is_match(text)
    }

    // Inside `ConstructClassifier` every export assignment is claimed by
    // `FunctionRule` first, so the exports capture only decides the name when
    // this rule is used on its own.
    fn name(&self, text: &str) -> Option<String> {
        self.exports.name(text).or_else(|| {
            self.tag
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().split_whitespace().next())
                .map(str::to_string)
        })
    }
}

/// `const`/`let`/`var` declarations
#[derive(Debug, Clone)]
pub struct VariableRule {
    pattern: Regex,
}

impl VariableRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(VARIABLE_DECL)?,
        })
    }
}

impl ConstructRule for VariableRule {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Variable
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    fn name(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string())
    }
}

/// `class <Name>` declarations
#[derive(Debug, Clone)]
pub struct ClassRule {
    pattern: Regex,
}

impl ClassRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(CLASS_DECL)?,
        })
    }
}

impl ConstructRule for ClassRule {
    fn kind(&self) -> ConstructKind {
        ConstructKind::Class
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    fn name(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// Ordered set of rules; the first match wins
pub struct ConstructClassifier {
    rules: Vec<Box<dyn ConstructRule>>,
}

impl ConstructClassifier {
    /// Classifier with the default rule set, arrow quirk enabled
    pub fn new() -> Result<Self> {
        Self::with_arrow_params(true)
    }

    /// Classifier with the default rule set
    pub fn with_arrow_params(arrow_params_as_name: bool) -> Result<Self> {
        Ok(Self {
            rules: vec![
                Box::new(FunctionRule::new(arrow_params_as_name)?),
                Box::new(ModuleRule::new()?),
                Box::new(VariableRule::new()?),
                Box::new(ClassRule::new()?),
            ],
        })
    }

    /// Kind and name of the construct in `text`; `other` when nothing matches
    pub fn classify(&self, text: &str) -> ConstructInfo {
        self.rules
            .iter()
            .find_map(|rule| rule.try_match(text))
            .unwrap_or_else(ConstructInfo::other)
    }

    /// Just the kind, without name extraction
    pub fn kind_of(&self, text: &str) -> ConstructKind {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| rule.kind())
            .unwrap_or(ConstructKind::Other)
    }
}

impl fmt::Debug for ConstructClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<ConstructKind> = self.rules.iter().map(|r| r.kind()).collect();
        f.debug_struct("ConstructClassifier")
            .field("rules", &kinds)
            .finish()
    }
}
