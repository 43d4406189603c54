//! Behaviour switches for a [`TextEdit`](super::TextEdit).

use std::time::Duration;

use crate::config::EditorConfig;

/// Runtime options derived from [`EditorConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOptions {
    /// Record edits in the undo log
    pub undo_enabled: bool,

    /// Reject every user edit (programmatic `set_text` still works)
    pub readonly: bool,

    /// Typed characters overwrite the one under the caret
    pub insert_mode: bool,

    /// Newline copies leading tabs (plus one after `:`)
    pub auto_indent: bool,

    /// Typing an opening bracket or quote inserts its partner
    pub auto_brace_completion: bool,

    /// Allow scrolling until only the last line is visible
    pub scroll_past_end_of_file: bool,

    /// Extra pixels between rows
    pub line_spacing: usize,

    /// Window for a third click to select the line
    pub triple_click: Duration,

    pub completion_enabled: bool,

    /// Characters that open completion even with an empty prefix
    pub completion_prefixes: Vec<String>,

    /// Keywords after which `keyword ` opens completion
    pub completion_keywords: Vec<String>,

    /// Popup rows; page up/down step
    pub completion_lines: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for EditOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            undo_enabled: config.undo_enabled,
            readonly: config.readonly,
            insert_mode: config.insert_mode,
            auto_indent: config.auto_indent,
            auto_brace_completion: config.auto_brace_completion,
            scroll_past_end_of_file: config.scroll_past_end_of_file,
            line_spacing: config.line_spacing,
            triple_click: Duration::from_millis(config.triple_click_ms),
            completion_enabled: config.completion.enabled,
            completion_prefixes: config.completion.prefixes.clone(),
            completion_keywords: config.completion.keywords.clone(),
            completion_lines: config.completion.visible_lines.max(1),
        }
    }
}

impl EditOptions {
    /// Options for a read-only viewer
    pub fn readonly() -> Self {
        Self {
            readonly: true,
            undo_enabled: false,
            ..Self::default()
        }
    }

    pub fn is_completion_prefix(&self, ch: char) -> bool {
        self.completion_prefixes
            .iter()
            .any(|p| p.chars().eq(std::iter::once(ch)))
    }
}
