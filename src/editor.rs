//! Line editor for level code. Only lines listed in the level metadata may be
//! changed, one line at a time, and the line count never changes.

use std::collections::BTreeSet;

use crate::error::GameResult;
use crate::level::{LevelMetadata, split_header};

/// A proposed edit spanning `from_line..=to_line` (0-based body lines).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditChange {
    pub from_line: usize,
    pub to_line: usize,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct CodeEditor {
    lines: Vec<String>,
    editable: BTreeSet<usize>,
    metadata: LevelMetadata,
}

impl CodeEditor {
    /// Parse a full level source (metadata header + body).
    pub fn from_source(source: &str) -> GameResult<Self> {
        let (metadata, body) = split_header(source)?;
        let editable = metadata.editable_lines()?;
        Ok(Self { lines: body.lines().map(str::to_string).collect(), editable, metadata })
    }

    pub fn metadata(&self) -> &LevelMetadata {
        &self.metadata
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_editable(&self, line: usize) -> bool {
        line < self.lines.len() && self.editable.contains(&line)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Apply `change` if it stays on one editable line. Returns whether it was
    /// accepted.
    pub fn apply(&mut self, change: &EditChange) -> bool {
        if change.from_line != change.to_line || !self.is_editable(change.to_line) {
            log::debug!("edit to lines {}..={} cancelled", change.from_line, change.to_line);
            return false;
        }
        if change.text.contains(['\n', '\r']) {
            log::debug!("edit on line {} cancelled: line breaks are not allowed", change.to_line);
            return false;
        }
        self.lines[change.to_line] = change.text.clone();
        true
    }

    pub fn set_line(&mut self, line: usize, text: &str) -> bool {
        self.apply(&EditChange { from_line: line, to_line: line, text: text.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "// {\"editable\": [[2, 3]]}\nfn start_level(map) {\n    let x = 1;\n    let y = 2;\n}";

    #[test]
    fn header_is_stripped_and_ranges_are_one_based() {
        let ed = CodeEditor::from_source(SRC).unwrap();
        assert_eq!(ed.line_count(), 4);
        assert_eq!(ed.lines()[0], "fn start_level(map) {");
        assert!(!ed.is_editable(0));
        assert!(ed.is_editable(1));
        assert!(ed.is_editable(2));
        assert!(!ed.is_editable(3));
    }

    #[test]
    fn edits_outside_editable_lines_are_cancelled() {
        let mut ed = CodeEditor::from_source(SRC).unwrap();
        assert!(!ed.set_line(0, "fn oops(map) {"));
        assert!(!ed.set_line(42, "x"));
        assert!(ed.set_line(1, "    let x = 9;"));
        assert!(ed.text().contains("let x = 9;"));
    }

    #[test]
    fn multi_line_changes_are_cancelled() {
        let mut ed = CodeEditor::from_source(SRC).unwrap();
        let before = ed.text();
        assert!(!ed.apply(&EditChange { from_line: 1, to_line: 2, text: String::new() }));
        assert!(!ed.set_line(1, "let a = 1;\nlet b = 2;"));
        assert_eq!(ed.text(), before);
        assert_eq!(ed.line_count(), 4);
    }
}
