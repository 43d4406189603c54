//! TextEdit - the editing engine: buffer, caret, selection, history and services.
//!
//! Every text change goes through [`TextEdit::insert_text`] / [`TextEdit::remove_text`]
//! (or their unchecked internals) so the undo log sees each change exactly once.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::{ConfigError, EditorConfig};
use crate::util::text::{char_len, slice_chars, split_at_char};

use super::buffer::{ColorRegion, LineBuffer, RegionError, TextBuffer};
use super::clipboard::{Clipboard, MemoryClipboard};
use super::completion::CompletionSession;
use super::cursor::{Cursor, Position};
use super::history::{EditHistory, EditOperation, OpKind};
use super::metrics::{FontMetrics, MonospaceMetrics};
use super::navigation::ViewportSize;
use super::notify::{EditorEvent, Notifier};
use super::options::EditOptions;
use super::search::SearchState;
use super::selection::Selection;

/// Marker inserted at the caret by [`TextEdit::get_text_for_completion`].
pub const CURSOR_MARKER: char = '\u{FFFF}';

/// Contract violations rejected by the mutation funnel before anything changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("line {line} out of range (document has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
    #[error("column {column} out of range on line {line} (length {len})")]
    ColumnOutOfRange {
        line: usize,
        column: usize,
        len: usize,
    },
    #[error("range start {from:?} is after its end {to:?}")]
    InvertedRange { from: Position, to: Position },
}

/// Multi-line text editing engine with one caret and one selection.
pub struct TextEdit {
    pub(super) text: LineBuffer,
    pub(super) cursor: Cursor,
    pub(super) selection: Selection,
    pub(super) history: EditHistory,
    pub(super) completion: CompletionSession,
    pub(super) notifier: Notifier,
    pub(super) clipboard: Box<dyn Clipboard>,
    pub(super) options: EditOptions,
    pub(super) viewport: ViewportSize,
    pub(super) search: SearchState,
    /// Last cut/copy took a whole line because nothing was selected
    pub(super) cut_copy_line: bool,
    /// Time and row of the last double-click, for triple-click detection
    pub(super) last_double_click: Option<(Instant, usize)>,
    setting_text: bool,
}

impl fmt::Debug for TextEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEdit")
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("completion", &self.completion)
            .field("options", &self.options)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Default for TextEdit {
    fn default() -> Self {
        Self::with_services(
            LineBuffer::default(),
            EditOptions::default(),
            Box::new(MemoryClipboard::new()),
        )
    }
}

impl TextEdit {
    /// Build an engine from configuration and host services.
    pub fn new(
        config: &EditorConfig,
        metrics: Arc<dyn FontMetrics>,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut text = LineBuffer::new(metrics, config.tab_size);
        text.set_regions(config.color_regions()?);

        let mut edit = Self::with_services(text, EditOptions::from(config), clipboard);
        edit.history.set_max_ops(config.history_limit);
        Ok(edit)
    }

    /// Engine with default options, monospace metrics and a memory clipboard.
    pub fn from_text(text: &str) -> Self {
        let mut edit = Self::default();
        edit.set_text(text);
        edit
    }

    fn with_services(text: LineBuffer, options: EditOptions, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            text,
            cursor: Cursor::default(),
            selection: Selection::default(),
            history: EditHistory::new(),
            completion: CompletionSession::default(),
            notifier: Notifier::default(),
            clipboard,
            options,
            viewport: ViewportSize::default(),
            search: SearchState::default(),
            cut_copy_line: false,
            last_double_click: None,
            setting_text: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn buffer(&self) -> &LineBuffer {
        &self.text
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_position(&self) -> Position {
        self.cursor.position()
    }

    pub fn cursor_get_line(&self) -> usize {
        self.cursor.line
    }

    pub fn cursor_get_column(&self) -> usize {
        self.cursor.column
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selection_active(&self) -> bool {
        self.selection.active
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut EditOptions {
        &mut self.options
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn get_text(&self) -> String {
        self.text.content()
    }

    /// Line `i`, or an empty string past the end.
    pub fn get_line(&self, i: usize) -> &str {
        if i < self.text.len() {
            self.text.line(i)
        } else {
            ""
        }
    }

    pub fn get_line_count(&self) -> usize {
        self.text.len()
    }

    pub fn get_char_count(&self) -> usize {
        self.text.char_count()
    }

    /// Text between two positions, lines joined by `\n`. Positions are clamped.
    pub fn get_text_range(&self, from: Position, to: Position) -> String {
        let last = self.text.len() - 1;
        let from_line = from.line.min(last);
        let to_line = to.line.min(last);
        if from_line == to_line {
            return slice_chars(self.text.line(from_line), from.column, to.column).to_string();
        }

        let mut out = String::new();
        for i in from_line..=to_line {
            let line = self.text.line(i);
            if i == from_line {
                out.push_str(slice_chars(line, from.column, usize::MAX));
            } else if i == to_line {
                out.push_str(slice_chars(line, 0, to.column));
            } else {
                out.push_str(line);
            }
            if i < to_line {
                out.push('\n');
            }
        }
        out
    }

    /// Full text with [`CURSOR_MARKER`] at the caret, for completion providers.
    pub fn get_text_for_completion(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.text.lines().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if i == self.cursor.line {
                let (before, after) = split_at_char(line.text(), self.cursor.column);
                out.push_str(before);
                out.push(CURSOR_MARKER);
                out.push_str(after);
            } else {
                out.push_str(line.text());
            }
        }
        out
    }

    /// Take the notifications raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.notifier.drain()
    }

    /// Whether notifications are waiting to be drained.
    pub fn has_pending_events(&self) -> bool {
        !self.notifier.is_empty()
    }

    pub(super) fn text_changed(&mut self) {
        if self.setting_text {
            self.notifier.redraw();
        } else {
            self.notifier.text_changed();
        }
    }

    // =========================================================================
    // Mutation funnel
    // =========================================================================

    fn check_line(&self, line: usize) -> Result<(), EditError> {
        let count = self.text.len();
        if line >= count {
            return Err(EditError::LineOutOfRange { line, count });
        }
        Ok(())
    }

    fn check_position(&self, pos: Position) -> Result<(), EditError> {
        self.check_line(pos.line)?;
        let len = self.text.line_length(pos.line);
        if pos.column > len {
            return Err(EditError::ColumnOutOfRange {
                line: pos.line,
                column: pos.column,
                len,
            });
        }
        Ok(())
    }

    /// Insert `text` at `(line, col)` and return the position just past it.
    ///
    /// A column past the end of the line pads with spaces first; the padding is
    /// part of the recorded edit so undo removes it too.
    pub fn insert_text(&mut self, line: usize, col: usize, text: &str) -> Result<Position, EditError> {
        self.check_line(line)?;
        Ok(self.apply_insert(line, col, text))
    }

    /// Remove the text between two positions.
    pub fn remove_text(
        &mut self,
        from_line: usize,
        from_col: usize,
        to_line: usize,
        to_col: usize,
    ) -> Result<(), EditError> {
        let from = Position::new(from_line, from_col);
        let to = Position::new(to_line, to_col);
        self.check_position(from)?;
        self.check_position(to)?;
        if from > to {
            return Err(EditError::InvertedRange { from, to });
        }
        self.apply_remove(from, to);
        Ok(())
    }

    /// Insert without validation. `line` must exist.
    pub(super) fn apply_insert(&mut self, line: usize, col: usize, text: &str) -> Position {
        let mut text = text.replace('\r', "");
        let len = self.text.line_length(line);
        let col = if col > len {
            text.insert_str(0, &" ".repeat(col - len));
            len
        } else {
            col
        };
        if text.is_empty() {
            return Position::new(line, col);
        }

        if self.options.undo_enabled {
            self.history.clear_redo();
        }
        let end = self.base_insert(line, col, &text);
        if self.options.undo_enabled {
            self.history.record_insert(Position::new(line, col), end, &text);
        }
        self.text_changed();
        end
    }

    /// Remove without validation. Both positions must exist and be ordered.
    pub(super) fn apply_remove(&mut self, from: Position, to: Position) {
        if from >= to {
            return;
        }
        if self.options.undo_enabled {
            self.history.clear_redo();
        }
        let removed = self.base_remove(from, to);
        if self.options.undo_enabled {
            self.history.record_remove(from, to, &removed);
        }
        self.keep_in_bounds();
        self.text_changed();
    }

    fn base_insert(&mut self, line: usize, col: usize, text: &str) -> Position {
        let current = self.text.line(line);
        let (prefix, suffix) = split_at_char(current, col);
        let (prefix, suffix) = (prefix.to_string(), suffix.to_string());

        let parts: Vec<&str> = text.split('\n').collect();
        let last = parts.len() - 1;
        if last == 0 {
            self.text.set(line, format!("{prefix}{text}{suffix}"));
            return Position::new(line, col + char_len(text));
        }

        self.text.set(line, format!("{prefix}{}", parts[0]));
        let rest = parts[1..].iter().enumerate().map(|(k, part)| {
            if k + 1 == last {
                format!("{part}{suffix}")
            } else {
                part.to_string()
            }
        });
        self.text.insert_many(line + 1, rest.collect::<Vec<_>>());
        Position::new(line + last, char_len(parts[last]))
    }

    fn base_remove(&mut self, from: Position, to: Position) -> String {
        let removed = self.get_text_range(from, to);
        let prefix = slice_chars(self.text.line(from.line), 0, from.column).to_string();
        let suffix = slice_chars(self.text.line(to.line), to.column, usize::MAX).to_string();
        self.text.remove_range(from.line + 1, to.line + 1);
        self.text.set(from.line, prefix + &suffix);
        removed
    }

    /// Pull caret and selection back inside the document after lines vanish.
    fn keep_in_bounds(&mut self) {
        let last = self.text.len() - 1;
        if self.cursor.line > last {
            self.cursor.line = last;
        }
        self.cursor.line_ofs = self.cursor.line_ofs.min(last);
        let len = self.text.line_length(self.cursor.line);
        if self.cursor.column > len {
            self.cursor.column = len;
        }
        if self.selection.active {
            let to = self.selection.to();
            if to.line > last || to.column > self.text.line_length(to.line) {
                self.selection.clear();
            }
        }
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(ops) = self.history.undo() else {
            return false;
        };
        for op in &ops {
            self.revert(op);
        }
        tracing::debug!(ops = ops.len(), version = self.history.version(), "undo");

        if let Some(earliest) = ops.last() {
            self.place_cursor_after_history(earliest.undo_cursor());
        }
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(ops) = self.history.redo() else {
            return false;
        };
        for op in &ops {
            self.reapply(op);
        }
        tracing::debug!(ops = ops.len(), version = self.history.version(), "redo");

        if let Some(latest) = ops.last() {
            self.place_cursor_after_history(latest.redo_cursor());
        }
        true
    }

    fn revert(&mut self, op: &EditOperation) {
        match op.kind {
            OpKind::Insert => {
                self.base_remove(op.from(), op.to());
            }
            OpKind::Remove | OpKind::Clear => {
                self.base_insert(op.from_line, op.from_col, &op.text);
            }
        }
        self.text_changed();
    }

    fn reapply(&mut self, op: &EditOperation) {
        match op.kind {
            OpKind::Insert => {
                self.base_insert(op.from_line, op.from_col, &op.text);
            }
            OpKind::Remove | OpKind::Clear => {
                self.base_remove(op.from(), op.to());
            }
        }
        self.text_changed();
    }

    fn place_cursor_after_history(&mut self, pos: Position) {
        self.selection.clear();
        self.keep_in_bounds();
        self.cursor_set_line(pos.line, false);
        self.cursor_set_column(pos.column, true);
    }

    pub fn begin_complex_operation(&mut self) {
        self.history.begin_group();
    }

    pub fn end_complex_operation(&mut self) {
        self.history.end_group();
    }

    pub fn clear_undo_history(&mut self) {
        self.history.clear();
    }

    pub fn get_version(&self) -> u64 {
        self.history.version()
    }

    pub fn get_saved_version(&self) -> u64 {
        self.history.saved_version()
    }

    pub fn tag_saved_version(&mut self) {
        self.history.tag_saved_version();
    }

    /// Changed since the last [`tag_saved_version`](Self::tag_saved_version).
    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    // =========================================================================
    // Whole-document and line-level operations
    // =========================================================================

    /// Remove everything as one undoable step.
    pub fn clear(&mut self) {
        let text = self.get_text();
        if self.options.undo_enabled && !text.is_empty() {
            self.history.clear_redo();
            let last = self.text.len() - 1;
            let end = Position::new(last, self.text.line_length(last));
            self.history.record_clear(end, &text);
        }
        self.text.clear();
        self.cursor = Cursor::default();
        self.selection.clear();
        self.text_changed();
        self.notifier.cursor_changed();
    }

    /// Replace the document. Clears undo history and does not raise `TextChanged`.
    pub fn set_text(&mut self, text: &str) {
        self.setting_text = true;
        self.cancel_code_completion();
        self.clear();
        self.apply_insert(0, 0, text);
        self.history.clear();
        self.cursor = Cursor::default();
        self.cursor_set_line(0, true);
        self.cursor_set_column(0, true);
        self.setting_text = false;
    }

    /// Replace the content of line `line` as one undoable step.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<(), EditError> {
        self.check_line(line)?;
        let len = self.text.line_length(line);

        self.begin_complex_operation();
        self.apply_remove(Position::new(line, 0), Position::new(line, len));
        self.apply_insert(line, 0, text);
        self.end_complex_operation();

        let new_len = self.text.line_length(line);
        if self.cursor.line == line {
            self.cursor.column = self.cursor.column.min(new_len);
        }
        if self.selection.active && self.selection.to_line == line {
            self.selection.to_col = self.selection.to_col.min(new_len);
            if self.selection.from() >= self.selection.to() {
                self.selection.clear();
            }
        }
        Ok(())
    }

    /// Insert `text` as a new line before row `at` (`at == line count` appends).
    pub fn insert_at(&mut self, text: &str, at: usize) -> Result<(), EditError> {
        let count = self.text.len();
        if at > count {
            return Err(EditError::LineOutOfRange { line: at, count });
        }
        let lines_added = text.split('\n').count();
        if at == count {
            let last = count - 1;
            let len = self.text.line_length(last);
            self.apply_insert(last, len, &format!("\n{text}"));
        } else {
            self.apply_insert(at, 0, &format!("{text}\n"));
        }

        if at < count && self.cursor.line >= at {
            self.cursor.line += lines_added;
        }
        if self.selection.active && at < count {
            if self.selection.from_line >= at {
                self.selection.from_line += lines_added;
            }
            if self.selection.to_line >= at {
                self.selection.to_line += lines_added;
            }
        }
        self.notifier.cursor_changed();
        Ok(())
    }

    // =========================================================================
    // Markers and measurement settings
    // =========================================================================

    pub fn set_line_as_marked(&mut self, line: usize, marked: bool) {
        if line < self.text.len() {
            self.text.set_marked(line, marked);
            self.notifier.redraw();
        }
    }

    pub fn is_line_marked(&self, line: usize) -> bool {
        line < self.text.len() && self.text.is_marked(line)
    }

    pub fn set_line_as_breakpoint(&mut self, line: usize, breakpoint: bool) {
        if line < self.text.len() {
            self.text.set_breakpoint(line, breakpoint);
            self.notifier.redraw();
        }
    }

    pub fn is_line_set_as_breakpoint(&self, line: usize) -> bool {
        line < self.text.len() && self.text.is_breakpoint(line)
    }

    pub fn get_breakpoints(&self) -> Vec<usize> {
        self.text.breakpoints()
    }

    pub fn add_color_region(
        &mut self,
        begin_key: &str,
        end_key: &str,
        line_only: bool,
    ) -> Result<(), RegionError> {
        let region = ColorRegion::new(begin_key, end_key, line_only)?;
        self.text.add_region(region);
        self.notifier.redraw();
        Ok(())
    }

    pub fn clear_color_regions(&mut self) {
        self.text.set_regions(Vec::new());
        self.notifier.redraw();
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.text.set_tab_size(tab_size.max(1));
        self.notifier.redraw();
    }

    pub fn set_metrics(&mut self, metrics: Arc<dyn FontMetrics>) {
        self.text.set_metrics(metrics);
        self.notifier.redraw();
    }

    pub fn set_monospace(&mut self, cell_width: usize, line_height: usize) {
        self.set_metrics(Arc::new(MonospaceMetrics::new(cell_width, line_height)));
    }
}
