// Source file loading and the bounded line window that follows a comment

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A source file held in memory for the lifetime of its lookups
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

/// Trimmed lines following a comment's end line
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineWindow {
    /// The comment's own last line, trimmed
    pub anchor: String,
    /// Up to `size` trimmed lines after the anchor
    pub next_lines: Vec<String>,
}

impl LineWindow {
    /// Lines concatenated with no separator, as fed to the classifier
    pub fn joined(&self) -> String {
        self.next_lines.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.next_lines.is_empty()
    }
}

impl SourceFile {
    /// Read a file; failure is fatal for whatever operation needs it
    pub fn open(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::source_read(path, e))?;
        Ok(Self::from_source(path, content))
    }

    /// Wrap text that is already in memory
    pub fn from_source(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Window of up to `size` lines after 1-based `end_line`.
    ///
    /// Returns `None` when `end_line` is the last line of the file (or past
    /// it): nothing follows the comment. Line 0 has no window either.
    pub fn window_after(&self, end_line: usize, size: usize) -> Option<LineWindow> {
        let lines: Vec<&str> = self.content.split('\n').collect();
        let last_index = end_line.checked_sub(1)?;

        if last_index + 1 >= lines.len() {
            return None;
        }

        let end = (last_index + 1 + size).min(lines.len());
        Some(LineWindow {
            anchor: lines[last_index].trim().to_string(),
            next_lines: lines[last_index + 1..end]
                .iter()
                .map(|line| line.trim().to_string())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> SourceFile {
        SourceFile::from_source(
            "sample.js",
            "/**\n * Doc.\n */\n  function a() {\n\treturn 1;\n}\nconst b = 2;\nconst c = 3;\nlet d;",
        )
    }

    #[test]
    fn test_window_trims_and_bounds() {
        let window = sample().window_after(3, 5).unwrap();
        assert_eq!(window.anchor, "*/");
        assert_eq!(
            window.next_lines,
            vec!["function a() {", "return 1;", "}", "const b = 2;", "const c = 3;"]
        );
        assert_eq!(window.joined(), "function a() {return 1;}const b = 2;const c = 3;");
    }

    #[test]
    fn test_window_clipped_at_end_of_file() {
        let window = sample().window_after(7, 5).unwrap();
        assert_eq!(window.next_lines, vec!["const c = 3;", "let d;"]);
    }

    #[test]
    fn test_window_custom_size() {
        let window = sample().window_after(3, 2).unwrap();
        assert_eq!(window.next_lines.len(), 2);
    }

    #[test]
    fn test_no_window_on_last_line() {
        let file = sample();
        assert!(file.window_after(9, 5).is_none());
        assert!(file.window_after(42, 5).is_none());
    }

    #[test]
    fn test_trailing_newline_yields_blank_window() {
        let file = SourceFile::from_source("t.js", "/** tail */\n");
        let window = file.window_after(1, 5).unwrap();
        assert_eq!(window.next_lines, vec![""]);
        assert_eq!(window.joined(), "");
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let file = SourceFile::from_source("t.js", "/** x */\r\nclass Foo {}\r\n");
        let window = file.window_after(1, 5).unwrap();
        assert_eq!(window.anchor, "/** x */");
        assert_eq!(window.next_lines[0], "class Foo {}");
    }

    #[test]
    fn test_open_reads_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "/** a */\nconst a = 1;").unwrap();
        let file = SourceFile::open(tmp.path()).unwrap();
        assert_eq!(file.path(), tmp.path());
        assert!(file.content().contains("const a"));
    }

    #[test]
    fn test_open_missing_file_is_error() {
        let result = SourceFile::open(Path::new("/nonexistent/missing.js"));
        assert!(matches!(result, Err(Error::SourceRead { .. })));
    }
}
