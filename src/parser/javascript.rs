// JavaScript/TypeScript comment extraction using tree-sitter

use crate::error::{Error, Result};
use crate::parser::comment::{Comment, SourceLocation};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Supported JavaScript variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsVariant {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

impl JsVariant {
    /// Detect variant from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Detect variant from a file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Finds `/** ... */` blocks in JavaScript/TypeScript source
pub struct CommentExtractor {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl CommentExtractor {
    /// Create a new extractor with one parser per grammar
    pub fn new() -> Result<Self> {
        let mut js_parser = Parser::new();
        let js_language = tree_sitter_javascript::language();
        js_parser.set_language(&js_language).map_err(|e| {
            Error::Parser(format!("Failed to set JavaScript language: {}", e))
        })?;

        let mut ts_parser = Parser::new();
        let ts_language = tree_sitter_typescript::language_typescript();
        ts_parser.set_language(&ts_language).map_err(|e| {
            Error::Parser(format!("Failed to set TypeScript language: {}", e))
        })?;

        let mut tsx_parser = Parser::new();
        let tsx_language = tree_sitter_typescript::language_tsx();
        tsx_parser.set_language(&tsx_language).map_err(|e| {
            Error::Parser(format!("Failed to set TSX language: {}", e))
        })?;

        Ok(Self {
            js_parser,
            ts_parser,
            tsx_parser,
        })
    }

    /// Extract documentation comments from source text, in source order
    pub fn extract(&mut self, source: &str, variant: JsVariant) -> Result<Vec<Comment>> {
        let parser = match variant {
            JsVariant::TypeScript => &mut self.ts_parser,
            JsVariant::Tsx => &mut self.tsx_parser,
            JsVariant::JavaScript | JsVariant::Jsx => &mut self.js_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;

        let mut comments = Vec::new();
        collect_doc_comments(&tree.root_node(), source.as_bytes(), &mut comments);
        Ok(comments)
    }

    /// Extract comments from already-loaded file content, picking the grammar from the path
    pub fn extract_for_path(&mut self, path: &Path, source: &str) -> Result<Vec<Comment>> {
        let variant = JsVariant::from_path(path).ok_or_else(|| {
            Error::parse(path, "unsupported file extension")
        })?;
        self.extract(source, variant)
    }
}

/// Walk the tree and collect every JSDoc block, wherever it sits
fn collect_doc_comments(node: &Node, source: &[u8], out: &mut Vec<Comment>) {
    if node.kind() == "comment" {
        let text = get_text(node, source);
        if is_doc_block(text) {
            let start = node.start_position();
            let end = node.end_position();
            out.push(Comment::parse(
                text,
                SourceLocation::new(start.row + 1, start.column),
                SourceLocation::new(end.row + 1, end.column),
            ));
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_doc_comments(&child, source, out);
    }
}

/// `/** */` blocks only; `/**/` is an empty block comment
fn is_doc_block(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

/// Get text content of a node
fn get_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}
