use std::collections::BTreeMap;

use tracing::debug;

/// Splits on `\n`, dropping a trailing `\r` from each line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Refined list text broken into index-addressable lines, with per-line
/// user edits layered on top. Edits are dropped whenever the source text is
/// replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableGroceryList {
    source: String,
    lines: Vec<String>,
    overrides: BTreeMap<usize, String>,
}

impl EditableGroceryList {
    pub fn new(text: impl Into<String>) -> Self {
        let mut list = Self::default();
        list.replace_source(text);
        list
    }

    /// Installs new source text and clears every override.
    pub fn replace_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
        self.lines = if self.source.is_empty() { Vec::new() } else { split_lines(&self.source) };
        self.overrides.clear();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Returns whether the edit was recorded; out-of-range indices are ignored.
    pub fn set_override(&mut self, line_index: usize, new_text: impl Into<String>) -> bool {
        if line_index >= self.lines.len() {
            debug!(line_index, lines = self.lines.len(), "ignoring override for missing line");
            return false;
        }
        self.overrides.insert(line_index, new_text.into());
        true
    }

    pub fn clear_override(&mut self, line_index: usize) -> bool {
        self.overrides.remove(&line_index).is_some()
    }

    pub fn original_line(&self, line_index: usize) -> Option<&str> {
        self.lines.get(line_index).map(String::as_str)
    }

    /// The override if present, otherwise the original line.
    pub fn effective_line(&self, line_index: usize) -> Option<&str> {
        self.overrides
            .get(&line_index)
            .map(String::as_str)
            .or_else(|| self.original_line(line_index))
    }

    pub fn effective_lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.lines.len()).filter_map(move |index| self.effective_line(index))
    }

    pub fn to_display_text(&self) -> String {
        self.effective_lines().collect::<Vec<_>>().join("\n")
    }
}
