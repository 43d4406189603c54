//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use textedit_engine::editable::{Position, TextEdit, TextEditMsg};
use textedit_engine::update::update_text_edit;

/// Viewport used by every helper: 80 columns of 10px, 10 rows of 24px
pub const VIEW_WIDTH: usize = 800;
pub const VIEW_HEIGHT: usize = 240;

/// Create a test engine with given text and cursor position
pub fn test_edit(text: &str, line: usize, column: usize) -> TextEdit {
    let mut edit = TextEdit::from_text(text);
    edit.set_viewport_size(VIEW_WIDTH, VIEW_HEIGHT);
    edit.set_cursor_position(Position::new(line, column));
    edit.drain_events();
    edit
}

/// Create a test engine with given text and a selection (anchor to head).
/// The cursor will be at the head position.
pub fn test_edit_with_selection(
    text: &str,
    anchor_line: usize,
    anchor_col: usize,
    head_line: usize,
    head_col: usize,
) -> TextEdit {
    let mut edit = test_edit(text, head_line, head_col);
    edit.select(anchor_line, anchor_col, head_line, head_col);
    edit.drain_events();
    edit
}

/// `n` numbered lines: "line 0", "line 1", ...
pub fn numbered_lines(n: usize) -> String {
    (0..n)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Helper to get buffer content as string
pub fn buffer_to_string(edit: &TextEdit) -> String {
    edit.get_text()
}

pub fn send(edit: &mut TextEdit, msg: TextEditMsg) -> bool {
    update_text_edit(edit, msg)
}

/// Type a string one key at a time, mapping `\n` to Enter.
pub fn type_str(edit: &mut TextEdit, text: &str) {
    for ch in text.chars() {
        let msg = if ch == '\n' {
            TextEditMsg::InsertNewline
        } else {
            TextEditMsg::InsertChar(ch)
        };
        update_text_edit(edit, msg);
    }
}

pub fn cursor(edit: &TextEdit) -> (usize, usize) {
    let pos = edit.cursor_position();
    (pos.line, pos.column)
}
