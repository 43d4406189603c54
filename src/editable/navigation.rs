//! Caret placement, movement commands, selection range and viewport scrolling.

use crate::util::text::{char_type, is_text_char, leading_whitespace, slice_chars, CharType};

use super::buffer::TextBuffer;
use super::cursor::Position;
use super::selection::SelectingMode;
use super::state::TextEdit;

/// Pixels kept free to the right of the caret when scrolling horizontally.
pub const CARET_MARGIN: usize = 20;

/// Pixel size of the text area as reported by the host (gutters excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: usize,
    pub height: usize,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

// =============================================================================
// Caret setters and viewport
// =============================================================================

impl TextEdit {
    /// Move the caret to column `col` of its row (clamped) and remember its pixel x.
    pub fn cursor_set_column(&mut self, col: usize, adjust_viewport: bool) {
        let line = self.text.line(self.cursor.line);
        let col = col.min(self.text.line_length(self.cursor.line));
        self.cursor.column = col;
        self.cursor.last_fit_x = self.text.measure().x_offset(line, col);

        if adjust_viewport {
            self.adjust_viewport_to_cursor();
        }
        self.notifier.cursor_changed();
    }

    /// Move the caret to row `row` (clamped), picking the column nearest the
    /// remembered pixel x.
    pub fn cursor_set_line(&mut self, row: usize, adjust_viewport: bool) {
        let row = row.min(self.text.len() - 1);
        self.cursor.line = row;
        self.cursor.column = self
            .text
            .measure()
            .column_at(self.text.line(row), self.cursor.last_fit_x);

        if adjust_viewport {
            self.adjust_viewport_to_cursor();
        }
        self.notifier.cursor_changed();
    }

    /// Place the caret at a position (clamped), scrolling it into view.
    pub fn set_cursor_position(&mut self, pos: Position) {
        self.cursor_set_line(pos.line, false);
        self.cursor_set_column(pos.column, true);
    }

    pub fn set_viewport_size(&mut self, width: usize, height: usize) {
        self.viewport = ViewportSize { width, height };
        self.adjust_viewport_to_cursor();
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }

    /// Pixel height of one row including spacing.
    pub fn row_height(&self) -> usize {
        (self.text.metrics().line_height() + self.options.line_spacing).max(1)
    }

    /// Rows that fit in the viewport (at least one).
    pub fn get_visible_rows(&self) -> usize {
        (self.viewport.height / self.row_height()).max(1)
    }

    fn visible_width(&self) -> usize {
        self.viewport.width.saturating_sub(CARET_MARGIN)
    }

    fn cursor_x(&self) -> usize {
        self.text
            .measure()
            .x_offset(self.text.line(self.cursor.line), self.cursor.column)
    }

    /// Scroll the minimum amount that brings the caret into view.
    pub fn adjust_viewport_to_cursor(&mut self) {
        let rows = self.get_visible_rows();
        if self.cursor.line >= self.cursor.line_ofs.saturating_add(rows) {
            self.cursor.line_ofs = self.cursor.line + 1 - rows;
        }
        if self.cursor.line < self.cursor.line_ofs {
            self.cursor.line_ofs = self.cursor.line;
        }
        self.adjust_horizontal();
        self.notifier.redraw();
    }

    fn adjust_horizontal(&mut self) {
        let visible_width = self.visible_width();
        let cursor_x = self.cursor_x();
        if cursor_x > self.cursor.x_ofs.saturating_add(visible_width) {
            self.cursor.x_ofs = cursor_x - visible_width + 1;
        }
        if cursor_x < self.cursor.x_ofs {
            self.cursor.x_ofs = cursor_x;
        }
    }

    /// Scroll so the caret row sits in the middle of the viewport.
    pub fn center_viewport_to_cursor(&mut self) {
        let rows = self.get_visible_rows();
        let max_ofs = self.max_v_scroll();
        self.cursor.line_ofs = self.cursor.line.saturating_sub(rows / 2).min(max_ofs);
        self.adjust_horizontal();
        self.notifier.redraw();
    }

    fn max_v_scroll(&self) -> usize {
        let count = self.text.len();
        if self.options.scroll_past_end_of_file {
            count - 1
        } else {
            count.saturating_sub(self.get_visible_rows())
        }
    }

    pub fn get_v_scroll(&self) -> usize {
        self.cursor.line_ofs
    }

    /// Set the first visible row (clamped).
    pub fn set_v_scroll(&mut self, line_ofs: usize) {
        self.cursor.line_ofs = line_ofs.min(self.max_v_scroll());
        self.notifier.redraw();
    }

    pub fn get_h_scroll(&self) -> usize {
        self.cursor.x_ofs
    }

    pub fn set_h_scroll(&mut self, x_ofs: usize) {
        let max = self.text.get_max_width().saturating_sub(self.visible_width());
        self.cursor.x_ofs = x_ofs.min(max);
        self.notifier.redraw();
    }

    /// Scroll one row up, dragging the caret along if it would leave the view.
    pub fn scroll_lines_up(&mut self) {
        let ofs = self.get_v_scroll();
        if ofs > 0 {
            self.set_v_scroll(ofs - 1);
        }
        let last_visible = self.get_v_scroll().saturating_add(self.get_visible_rows());
        if self.cursor.line >= last_visible && !self.selection.active {
            self.cursor_set_line(last_visible - 1, false);
        }
    }

    /// Scroll one row down, dragging the caret along if it would leave the view.
    pub fn scroll_lines_down(&mut self) {
        let ofs = self.get_v_scroll();
        if ofs < self.max_v_scroll() {
            self.set_v_scroll(ofs + 1);
        }
        let first_visible = self.get_v_scroll();
        if self.cursor.line < first_visible && !self.selection.active {
            self.cursor_set_line(first_visible, false);
        }
    }

    /// Map a point in the text area to a document position.
    pub fn position_at_point(&self, x: usize, y: usize) -> Position {
        let row = self.cursor.line_ofs.saturating_add(y / self.row_height());
        let last = self.text.len() - 1;
        if row > last {
            return Position::new(last, self.text.line_length(last));
        }
        let col = self
            .text
            .measure()
            .column_at(self.text.line(row), x.saturating_add(self.cursor.x_ofs));
        Position::new(row, col)
    }
}

// =============================================================================
// Selection range
// =============================================================================

impl TextEdit {
    /// Select between two positions in either order. Clamps to the document; an
    /// empty range deselects.
    ///
    /// The first position becomes the anchor, so a later shift-click or
    /// shift-motion grows the selection from there. Any gesture in progress ends.
    pub fn select(&mut self, from_line: usize, from_col: usize, to_line: usize, to_col: usize) {
        self.set_selection(
            Position::new(from_line, from_col),
            Position::new(to_line, to_col),
        );
        self.selection.selecting_mode = SelectingMode::None;
    }

    /// Anchored range for gestures; leaves `selecting_mode` alone.
    pub(super) fn set_selection(&mut self, anchor: Position, head: Position) {
        let anchor = self.clamp_position(anchor);
        let head = self.clamp_position(head);
        let swapped = self.selection.set_range(anchor, head);
        self.selection.shiftclick_left = !swapped;
        self.selection.set_anchor(anchor);
        self.notifier.redraw();
    }

    fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.text.len() - 1);
        Position::new(line, pos.column.min(self.text.line_length(line)))
    }

    pub fn deselect(&mut self) {
        if self.selection.active {
            self.notifier.redraw();
        }
        self.selection.active = false;
    }

    /// Select the whole document and put the caret at its end. No-op when empty.
    pub fn select_all(&mut self) {
        if self.text.len() == 1 && self.text.line_length(0) == 0 {
            return;
        }
        let last = self.text.len() - 1;
        let end = Position::new(last, self.text.line_length(last));
        self.selection.set_range(Position::zero(), end);
        self.selection.set_anchor(Position::zero());
        self.selection.selecting_mode = SelectingMode::Shift;
        self.selection.shiftclick_left = true;
        self.cursor_set_line(end.line, false);
        self.cursor_set_column(end.column, false);
        self.notifier.redraw();
    }

    pub fn get_selection_text(&self) -> String {
        if !self.selection.active {
            return String::new();
        }
        self.get_text_range(self.selection.from(), self.selection.to())
    }

    /// Word the caret sits strictly inside. Empty at either edge of a word.
    pub fn get_word_under_cursor(&self) -> String {
        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let col = self.cursor.column.min(line.len());

        let mut start = col;
        while start > 0 && is_text_char(line[start - 1]) {
            start -= 1;
        }
        let mut end = col;
        while end < line.len() && is_text_char(line[end]) {
            end += 1;
        }
        if start == col || end == col {
            return String::new();
        }
        line[start..end].iter().collect()
    }

    /// Remove the selected text and put the caret where it started.
    pub(super) fn delete_selection(&mut self) {
        if !self.selection.active {
            return;
        }
        let from = self.selection.from();
        let to = self.selection.to();
        self.selection.clear();
        self.apply_remove(from, to);
        self.cursor_set_line(from.line, false);
        self.cursor_set_column(from.column, true);
    }

    pub(super) fn pre_shift_selection(&mut self) {
        let caret = self.cursor.position();
        if !self.selection.active {
            self.selection.set_anchor(caret);
            self.selection.active = true;
        } else if self.selection.selecting_mode == SelectingMode::None {
            // A range set by `select` keeps its far end when the caret is on the near one
            let (from, to) = (self.selection.from(), self.selection.to());
            let anchor = if caret == to {
                from
            } else if caret == from {
                to
            } else {
                caret
            };
            self.selection.set_anchor(anchor);
        }
        self.selection.selecting_mode = SelectingMode::Shift;
    }

    pub(super) fn post_shift_selection(&mut self) {
        if self.selection.active && self.selection.selecting_mode == SelectingMode::Shift {
            let anchor = self.selection.anchor();
            self.set_selection(anchor, self.cursor.position());
        }
    }

    fn with_motion(&mut self, extend: bool, motion: impl FnOnce(&mut Self)) {
        if extend {
            self.pre_shift_selection();
        } else {
            self.deselect();
        }
        motion(self);
        if extend {
            self.post_shift_selection();
        }
    }
}

// =============================================================================
// Movement commands
// =============================================================================

impl TextEdit {
    pub fn move_left(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            if edit.cursor.column > 0 {
                edit.cursor_set_column(edit.cursor.column - 1, true);
            } else if edit.cursor.line > 0 {
                edit.cursor_set_line(edit.cursor.line - 1, true);
                edit.cursor_set_column(usize::MAX, true);
            }
        });
    }

    pub fn move_right(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let len = edit.text.line_length(edit.cursor.line);
            if edit.cursor.column < len {
                edit.cursor_set_column(edit.cursor.column + 1, true);
            } else if edit.cursor.line + 1 < edit.text.len() {
                edit.cursor_set_line(edit.cursor.line + 1, true);
                edit.cursor_set_column(0, true);
            }
        });
    }

    /// Skip non-word characters, then the word before the caret.
    pub fn move_word_left(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let col = edit.word_left_column();
            match col {
                Some(col) => edit.cursor_set_column(col, true),
                None => {
                    edit.cursor_set_line(edit.cursor.line - 1, true);
                    edit.cursor_set_column(usize::MAX, true);
                }
            }
        });
    }

    /// Skip the run under the caret, then any whitespace after it.
    pub fn move_word_right(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let col = edit.word_right_column();
            match col {
                Some(col) => edit.cursor_set_column(col, true),
                None => {
                    edit.cursor_set_line(edit.cursor.line + 1, true);
                    edit.cursor_set_column(0, true);
                }
            }
        });
    }

    /// Column one word left of the caret; `None` means wrap to the previous line.
    pub(super) fn word_left_column(&self) -> Option<usize> {
        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let mut pos = self.cursor.column.min(line.len());
        if pos == 0 {
            return (self.cursor.line == 0).then_some(0);
        }
        while pos > 0 && char_type(line[pos - 1]) != CharType::WordChar {
            pos -= 1;
        }
        while pos > 0 && char_type(line[pos - 1]) == CharType::WordChar {
            pos -= 1;
        }
        Some(pos)
    }

    /// Column one word right of the caret; `None` means wrap to the next line.
    pub(super) fn word_right_column(&self) -> Option<usize> {
        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let mut pos = self.cursor.column.min(line.len());
        if pos >= line.len() {
            let last_line = self.cursor.line + 1 >= self.text.len();
            return last_line.then_some(line.len());
        }
        let start_type = char_type(line[pos]);
        while pos < line.len() && char_type(line[pos]) == start_type {
            pos += 1;
        }
        while pos < line.len() && char_type(line[pos]) == CharType::Whitespace {
            pos += 1;
        }
        Some(pos)
    }

    pub fn move_up(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            if edit.cursor.line > 0 {
                edit.cursor_set_line(edit.cursor.line - 1, true);
            }
        });
    }

    pub fn move_down(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            edit.cursor_set_line(edit.cursor.line + 1, true);
        });
    }

    /// Smart home: first non-whitespace column, or column 0 if already there.
    pub fn move_line_start(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let indent = leading_whitespace(edit.text.line(edit.cursor.line));
            let target = if edit.cursor.column == indent { 0 } else { indent };
            edit.cursor_set_column(target, true);
        });
    }

    pub fn move_line_end(&mut self, extend: bool) {
        self.with_motion(extend, |edit| edit.cursor_set_column(usize::MAX, true));
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            edit.cursor_set_line(0, false);
            edit.cursor_set_column(0, true);
        });
    }

    pub fn move_document_end(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            edit.cursor_set_line(usize::MAX, false);
            edit.cursor_set_column(usize::MAX, true);
        });
    }

    pub fn move_page_up(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let rows = edit.get_visible_rows();
            edit.cursor_set_line(edit.cursor.line.saturating_sub(rows), true);
        });
    }

    pub fn move_page_down(&mut self, extend: bool) {
        self.with_motion(extend, |edit| {
            let rows = edit.get_visible_rows();
            edit.cursor_set_line(edit.cursor.line.saturating_add(rows), true);
        });
    }

    /// Jump to a row, keeping it centered.
    pub fn goto_line(&mut self, line: usize) {
        self.deselect();
        self.cursor_set_line(line, false);
        self.cursor_set_column(0, false);
        self.center_viewport_to_cursor();
    }

    /// Text of the visible part of the caret row up to the caret (for hint placement).
    pub fn line_before_cursor(&self) -> &str {
        slice_chars(self.text.line(self.cursor.line), 0, self.cursor.column)
    }
}
