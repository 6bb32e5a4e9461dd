// Documentation comment types
//
// A `Comment` is one `/** ... */` block pulled out of a source file, with
// its position and the structured data found in its block tags.

use serde::{Deserialize, Serialize};

/// A position in a source file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line number
    pub line: usize,
    /// 0-based column
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A parsed documentation comment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub start_location: Option<SourceLocation>,
    pub end_location: Option<SourceLocation>,
    /// Free text before the first block tag
    pub description: String,
    pub params: Vec<DocParam>,
    pub returns: Vec<DocReturn>,
    pub thrown_errors: Vec<DocThrow>,
    pub link: Option<String>,
    /// Block tags without a dedicated field (`@module`, `@category`, ...)
    pub tags: Vec<DocTag>,
}

/// `@param {type} name - description`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: Option<String>,
    pub description: String,
}

/// `@returns {type} description`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocReturn {
    #[serde(rename = "type")]
    pub type_expr: Option<String>,
    pub description: String,
}

/// `@throws {type} description`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocThrow {
    #[serde(rename = "type")]
    pub type_expr: Option<String>,
    pub description: String,
}

/// Any other block tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocTag {
    pub tag: String,
    pub value: String,
}

impl Comment {
    /// Parse the raw text of a `/** ... */` block
    pub fn parse(raw: &str, start: SourceLocation, end: SourceLocation) -> Self {
        let mut comment = Comment::from_text(raw);
        comment.start_location = Some(start);
        comment.end_location = Some(end);
        comment
    }

    /// Parse comment text with no position attached
    pub fn from_text(raw: &str) -> Self {
        let mut comment = Comment::default();
        let mut description: Vec<&str> = Vec::new();
        let mut current: Option<(String, String)> = None;

        for line in clean_lines(raw) {
            if let Some(rest) = line.strip_prefix('@') {
                if let Some((tag, value)) = current.take() {
                    comment.push_tag(&tag, &value);
                }
                let (tag, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                current = Some((tag.to_string(), value.trim().to_string()));
            } else if let Some((_, value)) = current.as_mut() {
                if !line.is_empty() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line);
                }
            } else {
                description.push(line);
            }
        }

        if let Some((tag, value)) = current.take() {
            comment.push_tag(&tag, &value);
        }

        comment.description = description.join("\n").trim().to_string();
        comment
    }

    fn push_tag(&mut self, tag: &str, value: &str) {
        match tag {
            "param" | "arg" | "argument" => {
                let (type_expr, rest) = split_type(value);
                let (name, description) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if name.is_empty() {
                    return;
                }
                self.params.push(DocParam {
                    name: param_name(name),
                    type_expr,
                    description: strip_dash(description),
                });
            }
            "returns" | "return" => {
                let (type_expr, rest) = split_type(value);
                self.returns.push(DocReturn {
                    type_expr,
                    description: strip_dash(rest),
                });
            }
            "throws" | "throw" | "exception" => {
                let (type_expr, rest) = split_type(value);
                self.thrown_errors.push(DocThrow {
                    type_expr,
                    description: strip_dash(rest),
                });
            }
            "link" | "see" if self.link.is_none() && !value.is_empty() => {
                self.link = Some(value.to_string());
            }
            _ => self.tags.push(DocTag {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Value of the first occurrence of a free-form tag
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.tag == name)
            .map(|t| t.value.as_str())
    }

    /// Name given by an `@module` tag, if any
    pub fn module_name(&self) -> Option<&str> {
        self.tag("module")
            .and_then(|v| v.split_whitespace().next())
    }

    /// Whether both positions are known
    pub fn is_located(&self) -> bool {
        self.start_location.is_some() && self.end_location.is_some()
    }
}

/// Strip comment delimiters and leading `*` gutters
fn clean_lines(raw: &str) -> impl Iterator<Item = &str> {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.split('\n').map(|line| {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line);
        line.trim()
    })
}

/// Split a leading `{type}` off a tag value, honouring nested braces
fn split_type(value: &str) -> (Option<String>, &str) {
    let value = value.trim_start();
    if !value.starts_with('{') {
        return (None, value);
    }

    let mut depth = 0usize;
    for (idx, ch) in value.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let type_expr = value[1..idx].trim().to_string();
                    let rest = value[idx + 1..].trim_start();
                    return (Some(type_expr).filter(|t| !t.is_empty()), rest);
                }
            }
            _ => {}
        }
    }

    // Unbalanced: treat everything as plain text
    (None, value)
}

/// `[name=default]` and `[name]` mark optional params
fn param_name(raw: &str) -> String {
    let name = raw.trim_start_matches('[').trim_end_matches(']');
    name.split('=').next().unwrap_or(name).to_string()
}

fn strip_dash(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('-').unwrap_or(text).trim().to_string()
}
