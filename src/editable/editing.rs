//! Key-level editing commands: typing, deletion, indentation and clipboard.
//!
//! These sit on top of the mutation funnel and honor `readonly`. The raw
//! [`TextEdit::insert_text`] / [`TextEdit::remove_text`] API does not.

use crate::util::text::{closing_pair, is_closing_pair, is_text_char, leading_tabs};

use super::buffer::TextBuffer;
use super::cursor::Position;
use super::state::TextEdit;

/// Target case for [`TextEdit::convert_case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

fn is_pair_left(ch: char) -> bool {
    closing_pair(ch).is_some()
}

fn is_pair_symbol(ch: char) -> bool {
    is_pair_left(ch) || is_closing_pair(ch)
}

impl TextEdit {
    /// Insert at the caret and move the caret past the inserted text.
    pub(super) fn insert_at_cursor_raw(&mut self, text: &str) {
        let end = self.apply_insert(self.cursor.line, self.cursor.column, text);
        self.cursor_set_line(end.line, true);
        self.cursor_set_column(end.column, true);
    }

    /// Insert at the caret, replacing the selection if there is one.
    pub fn insert_text_at_cursor(&mut self, text: &str) {
        if self.selection.active {
            self.begin_complex_operation();
            self.delete_selection();
            self.insert_at_cursor_raw(text);
            self.end_complex_operation();
        } else {
            self.insert_at_cursor_raw(text);
        }
    }

    /// Type one printable character the way a key press would.
    ///
    /// Handles overwrite mode, auto brace pairing and replacing the selection.
    pub fn type_char(&mut self, ch: char) {
        if self.options.readonly {
            return;
        }
        let had_selection = self.selection.active;
        let wraps_selection = self.options.auto_brace_completion && is_pair_left(ch);
        let overwrite = self.options.insert_mode && !had_selection;
        // plain typing stays ungrouped so consecutive characters coalesce
        let grouped = (had_selection && !wraps_selection) || overwrite;

        if grouped {
            self.begin_complex_operation();
        }
        if had_selection && !wraps_selection {
            self.delete_selection();
        }
        if overwrite {
            let col = self.cursor.column;
            if col < self.text.line_length(self.cursor.line) {
                let line = self.cursor.line;
                self.apply_remove(Position::new(line, col), Position::new(line, col + 1));
            }
        }
        if ch == ')' {
            self.cancel_code_hint();
        }

        if self.options.auto_brace_completion && is_pair_symbol(ch) {
            self.consume_pair_symbol(ch);
        } else {
            let mut buf = [0u8; 4];
            self.insert_at_cursor_raw(ch.encode_utf8(&mut buf));
        }
        if grouped {
            self.end_complex_operation();
        }
    }

    fn consume_pair_symbol(&mut self, ch: char) {
        let close = closing_pair(ch);

        if self.selection.active {
            if let Some(close) = close {
                let from = self.selection.from();
                let to = self.selection.to();
                let offset = usize::from(from.line == to.line);
                self.begin_complex_operation();
                self.apply_insert(from.line, from.column, &ch.to_string());
                self.apply_insert(to.line, to.column + offset, &close.to_string());
                self.end_complex_operation();
                self.deselect();
                self.cursor_set_line(to.line, false);
                self.cursor_set_column(to.column + offset, true);
                return;
            }
            self.delete_selection();
        }

        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let col = self.cursor.column.min(line.len());
        let single = ch.to_string();

        let after_word = (ch == '"' || ch == '\'') && col > 0 && is_text_char(line[col - 1]);
        if after_word || line.get(col).is_some_and(|&c| is_text_char(c)) {
            self.insert_at_cursor_raw(&single);
            return;
        }
        if is_closing_pair(ch) && line.get(col) == Some(&ch) {
            self.cursor_set_column(col + 1, true);
            return;
        }

        let pair: String = std::iter::once(ch).chain(close).collect();
        self.insert_at_cursor_raw(&pair);
        self.cursor_set_column(col + 1, true);
    }

    /// Delete the character before the caret, or the line break at column 0.
    ///
    /// With auto brace completion, deleting an opening symbol also deletes the
    /// closing partner right after the caret.
    pub fn backspace_at_cursor(&mut self) {
        if self.options.readonly {
            return;
        }
        let (line, col) = (self.cursor.line, self.cursor.column);
        if line == 0 && col == 0 {
            return;
        }
        let prev = if col > 0 {
            Position::new(line, col - 1)
        } else {
            Position::new(line - 1, self.text.line_length(line - 1))
        };

        let text = self.text.line(line);
        let left = col.checked_sub(1).and_then(|c| text.chars().nth(c));
        let right = text.chars().nth(col);
        let remove_pair = self.options.auto_brace_completion
            && left.is_some_and(is_pair_left)
            && right.is_some()
            && right == left.and_then(closing_pair);

        let end = Position::new(line, if remove_pair { col + 1 } else { col });
        self.apply_remove(prev, end);
        self.cursor_set_line(prev.line, true);
        self.cursor_set_column(prev.column, true);
    }

    /// Backspace key: removes the selection if there is one.
    pub fn backspace(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.delete_selection();
        } else {
            self.backspace_at_cursor();
        }
    }

    /// Delete key: removes the selection, or the character after the caret.
    pub fn delete_forward(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.delete_selection();
            return;
        }
        let (line, col) = (self.cursor.line, self.cursor.column);
        let len = self.text.line_length(line);
        if line + 1 == self.text.len() && col >= len {
            return;
        }
        let next = if col < len {
            Position::new(line, col + 1)
        } else {
            Position::new(line + 1, 0)
        };
        self.apply_remove(Position::new(line, col), next);
    }

    /// Delete back over whitespace (across lines), then one word.
    pub fn delete_word_backward(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.delete_selection();
            return;
        }
        let mut line = self.cursor.line;
        let mut column = self.cursor.column;

        let mut only_whitespace = true;
        while only_whitespace && line > 0 {
            let chars: Vec<char> = self.text.line(line).chars().collect();
            while column > 0 {
                if !matches!(chars[column - 1], ' ' | '\t') {
                    only_whitespace = false;
                    break;
                }
                column -= 1;
            }
            if only_whitespace {
                line -= 1;
                column = self.text.line_length(line);
            }
        }

        let chars: Vec<char> = self.text.line(line).chars().collect();
        let mut prev_char = false;
        while column > 0 {
            let is_char = is_text_char(chars[column - 1]);
            if prev_char && !is_char {
                break;
            }
            prev_char = is_char;
            column -= 1;
        }

        let from = Position::new(line, column);
        self.apply_remove(from, self.cursor.position());
        self.cursor_set_line(from.line, true);
        self.cursor_set_column(from.column, true);
    }

    /// Delete forward over whitespace (across lines), then one word.
    pub fn delete_word_forward(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.delete_selection();
            return;
        }
        let last_line = self.text.len() - 1;
        let mut line = self.cursor.line;
        let mut column = self.cursor.column;

        let mut only_whitespace = true;
        while only_whitespace && line < last_line {
            let chars: Vec<char> = self.text.line(line).chars().collect();
            while column < chars.len() {
                if !matches!(chars[column], ' ' | '\t') {
                    only_whitespace = false;
                    break;
                }
                column += 1;
            }
            if only_whitespace {
                line += 1;
                column = 0;
            }
        }

        let chars: Vec<char> = self.text.line(line).chars().collect();
        let mut prev_char = false;
        while column < chars.len() {
            let is_char = is_text_char(chars[column]);
            if prev_char && !is_char {
                break;
            }
            prev_char = is_char;
            column += 1;
        }

        self.apply_remove(self.cursor.position(), Position::new(line, column));
    }

    /// Break the line at the caret, carrying leading tabs over. With `auto_indent`
    /// a `:` before the caret adds one more tab.
    pub fn newline(&mut self) {
        if self.options.readonly {
            return;
        }
        let current = self.text.line(self.cursor.line);
        let mut ins = String::from("\n");
        ins.push_str(&"\t".repeat(leading_tabs(current)));
        if self.options.auto_indent
            && self.cursor.column > 0
            && current.chars().nth(self.cursor.column - 1) == Some(':')
        {
            ins.push('\t');
        }
        self.insert_text_at_cursor(&ins);
        self.history.flush();
    }

    /// Start a new line below the caret row without splitting it.
    pub fn open_line_below(&mut self) {
        if self.options.readonly {
            return;
        }
        self.deselect();
        self.cursor_set_column(usize::MAX, false);
        self.newline();
    }

    /// Start a new line above the caret row.
    pub fn open_line_above(&mut self) {
        if self.options.readonly {
            return;
        }
        self.deselect();
        if self.cursor.line > 0 {
            self.cursor_set_line(self.cursor.line - 1, false);
            self.cursor_set_column(usize::MAX, false);
            self.newline();
        } else {
            self.cursor_set_column(0, false);
            self.newline();
            self.cursor_set_line(0, true);
        }
    }

    /// Tab key: indent the selected lines, or insert a tab.
    pub fn tab(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.indent_selection_right();
        } else {
            self.insert_at_cursor_raw("\t");
        }
    }

    /// Shift+Tab: unindent the selected lines, or remove a tab before the caret.
    pub fn back_tab(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            self.indent_selection_left();
            return;
        }
        let col = self.cursor.column;
        if col > 0 && self.text.line(self.cursor.line).chars().nth(col - 1) == Some('\t') {
            self.backspace_at_cursor();
        }
    }

    /// Selected rows to indent; a selection ending at column 0 leaves that row out.
    fn selected_rows(&self) -> std::ops::RangeInclusive<usize> {
        let start = self.selection.from_line;
        let mut end = self.selection.to_line;
        if self.selection.to_col == 0 && end > start {
            end -= 1;
        }
        start..=end
    }

    pub fn indent_selection_right(&mut self) {
        if !self.selection.active || self.options.readonly {
            return;
        }
        self.begin_complex_operation();
        for row in self.selected_rows() {
            self.apply_insert(row, 0, "\t");
        }
        self.end_complex_operation();

        if self.selection.to_col > 0 {
            self.selection.to_col += 1;
        }
        if self.selection.from_col > 0 {
            self.selection.from_col += 1;
        }
        self.notifier.redraw();
    }

    /// Remove one tab, or four spaces, from the start of each selected row.
    pub fn indent_selection_left(&mut self) {
        if !self.selection.active || self.options.readonly {
            return;
        }
        let rows = self.selected_rows();
        let last_row = *rows.end();

        self.begin_complex_operation();
        for row in rows {
            let text = self.text.line(row);
            let strip = if text.starts_with('\t') {
                1
            } else if text.starts_with("    ") {
                4
            } else {
                0
            };
            if strip == 0 {
                continue;
            }
            self.apply_remove(Position::new(row, 0), Position::new(row, strip));
            if row == self.selection.to_line {
                self.selection.to_col = self.selection.to_col.saturating_sub(strip);
            }
            if row == self.selection.from_line {
                self.selection.from_col = self.selection.from_col.saturating_sub(strip);
            }
        }
        self.end_complex_operation();

        let len = self.text.line_length(last_row);
        if self.selection.to_line == last_row {
            self.selection.to_col = self.selection.to_col.min(len);
        }
        self.cursor.column = self.cursor.column.min(self.text.line_length(self.cursor.line));
        self.notifier.redraw();
    }

    /// Copy the selection, or the whole caret row when nothing is selected.
    pub fn copy(&mut self) {
        let text = if self.selection.active {
            self.cut_copy_line = false;
            self.get_selection_text()
        } else {
            self.cut_copy_line = true;
            self.text.line(self.cursor.line).to_string()
        };
        self.clipboard.set_text(text);
    }

    /// Cut the selection, or the whole caret row when nothing is selected.
    pub fn cut(&mut self) {
        if self.options.readonly {
            return;
        }
        if self.selection.active {
            let text = self.get_selection_text();
            self.clipboard.set_text(text);
            self.delete_selection();
            self.cut_copy_line = false;
            return;
        }

        let line = self.cursor.line;
        self.clipboard.set_text(self.text.line(line).to_string());
        self.begin_complex_operation();
        self.cursor_set_column(0, false);
        let len = self.text.line_length(line);
        self.apply_remove(Position::new(line, 0), Position::new(line, len));
        self.backspace_at_cursor();
        self.end_complex_operation();
        self.cursor_set_line(self.cursor.line + 1, true);
        self.cut_copy_line = true;
    }

    /// Paste the clipboard over the selection. A whole line copied without a
    /// selection is pasted above the caret row.
    pub fn paste(&mut self) {
        if self.options.readonly {
            return;
        }
        let mut text = self.clipboard.get_text();
        self.begin_complex_operation();
        if self.selection.active {
            self.delete_selection();
        } else if self.cut_copy_line {
            self.cursor_set_column(0, false);
            text.push('\n');
        }
        self.insert_at_cursor_raw(&text);
        self.end_complex_operation();
    }

    /// Change the case of the selected text as one undo step.
    pub fn convert_case(&mut self, case: Case) {
        if !self.selection.active || self.options.readonly {
            return;
        }
        let text = self.get_selection_text();
        let converted = match case {
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
        };
        self.begin_complex_operation();
        self.delete_selection();
        self.insert_at_cursor_raw(&converted);
        self.end_complex_operation();
    }

    pub fn set_insert_mode(&mut self, insert_mode: bool) {
        self.options.insert_mode = insert_mode;
        self.notifier.redraw();
    }

    pub fn toggle_insert_mode(&mut self) {
        self.set_insert_mode(!self.options.insert_mode);
    }

    /// Clear the selection and leave any gesture (unmodified click, Escape).
    pub fn reset_selection(&mut self) {
        if self.selection.active {
            self.notifier.redraw();
        }
        self.selection.clear();
    }
}
