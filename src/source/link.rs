// Comment-to-construct linking
//
// Given a comment's end location, look at the lines that follow it and decide
// what the comment documents.

use crate::config::{LinkingConfig, DEFAULT_WINDOW_SIZE};
use crate::error::Result;
use crate::parser::Comment;
use crate::source::classify::{ConstructClassifier, ConstructInfo, ConstructKind};
use crate::source::window::{LineWindow, SourceFile};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Sentinel the end-of-file case reports for both type and name
pub const NO_CONSTRUCT: &str = "other";

/// Outcome of linking one comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedConstruct {
    /// The comment carries no usable start/end location
    Unlocated,
    /// The comment ends on the file's last line; nothing follows it
    EndOfFile,
    /// The window after the comment was classified
    Classified {
        info: ConstructInfo,
        window: LineWindow,
    },
}

impl LinkedConstruct {
    /// `type` as reported downstream: `null`, `"other"` or the kind
    pub fn construct_type(&self) -> Option<&str> {
        match self {
            LinkedConstruct::Unlocated => None,
            LinkedConstruct::EndOfFile => Some(NO_CONSTRUCT),
            LinkedConstruct::Classified { info, .. } => Some(info.kind.as_str()),
        }
    }

    /// `name` as reported downstream: `null`, `"other"`, or the extracted name if any
    pub fn construct_name(&self) -> Option<&str> {
        match self {
            LinkedConstruct::Unlocated => None,
            LinkedConstruct::EndOfFile => Some(NO_CONSTRUCT),
            LinkedConstruct::Classified { info, .. } => info.name.as_deref(),
        }
    }

    /// The classified construct, when there is a real one
    pub fn construct(&self) -> Option<&ConstructInfo> {
        match self {
            LinkedConstruct::Classified { info, .. } if !info.is_other() => Some(info),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ConstructKind> {
        self.construct().map(|info| info.kind)
    }

    pub fn window(&self) -> Option<&LineWindow> {
        match self {
            LinkedConstruct::Classified { window, .. } => Some(window),
            _ => None,
        }
    }

    /// Whether a documented construct was found
    pub fn is_documented(&self) -> bool {
        self.construct().is_some()
    }
}

// Unlocated: {"type": null, "name": null}
// EndOfFile: {"type": "other", "name": "other"}
// Classified: {"type": .., "name": .. (omitted when absent), "nextLines": [..]}
impl Serialize for LinkedConstruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            LinkedConstruct::Unlocated | LinkedConstruct::EndOfFile => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &self.construct_type())?;
                map.serialize_entry("name", &self.construct_name())?;
                map.end()
            }
            LinkedConstruct::Classified { info, window } => {
                let len = if info.name.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", &info.kind)?;
                if let Some(name) = &info.name {
                    map.serialize_entry("name", name)?;
                }
                map.serialize_entry("nextLines", &window.next_lines)?;
                map.end()
            }
        }
    }
}

/// Links comments of a file to the constructs that follow them
#[derive(Debug)]
pub struct ConstructLinker {
    classifier: ConstructClassifier,
    window_size: usize,
}

impl ConstructLinker {
    /// Linker with the default window and rules
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: ConstructClassifier::new()?,
            window_size: DEFAULT_WINDOW_SIZE,
        })
    }

    /// Linker configured from the `[linking]` section
    pub fn from_config(config: &LinkingConfig) -> Result<Self> {
        Ok(Self {
            classifier: ConstructClassifier::with_arrow_params(config.arrow_params_as_name)?,
            window_size: config.window_size,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn classifier(&self) -> &ConstructClassifier {
        &self.classifier
    }

    /// Determine what `comment` documents inside `file`
    pub fn link(&self, file: &SourceFile, comment: &Comment) -> LinkedConstruct {
        let (Some(start), Some(end)) = (comment.start_location, comment.end_location) else {
            return LinkedConstruct::Unlocated;
        };

        if start.line == 0 || end.line == 0 {
            return LinkedConstruct::Unlocated;
        }

        match file.window_after(end.line, self.window_size) {
            Some(window) => {
                let info = self.classifier.classify(&window.joined());
                LinkedConstruct::Classified { info, window }
            }
            None => LinkedConstruct::EndOfFile,
        }
    }

    /// Link every comment, keeping source order
    pub fn link_all(
        &self,
        file: &SourceFile,
        comments: Vec<Comment>,
    ) -> Vec<(Comment, LinkedConstruct)> {
        comments
            .into_iter()
            .map(|comment| {
                let linked = self.link(file, &comment);
                match &linked {
                    LinkedConstruct::Unlocated => tracing::debug!(
                        file = %file.path().display(),
                        "comment has no location; cannot link"
                    ),
                    LinkedConstruct::EndOfFile => tracing::debug!(
                        file = %file.path().display(),
                        "comment ends the file; no construct follows"
                    ),
                    LinkedConstruct::Classified { info, .. } => tracing::trace!(
                        file = %file.path().display(),
                        kind = %info.kind,
                        name = info.name.as_deref().unwrap_or("-"),
                        "linked comment"
                    ),
                }
                (comment, linked)
            })
            .collect()
    }
}
