//! Text editing tests - typing, deletion, indentation, clipboard

mod common;

use common::{buffer_to_string, cursor, send, test_edit, test_edit_with_selection, type_str};
use pretty_assertions::assert_eq;
use textedit_engine::editable::{Case, MemoryClipboard, TextEditMsg};

// ========================================================================
// InsertChar tests
// ========================================================================

#[test]
fn test_insert_char_at_start() {
    let mut edit = test_edit("hello", 0, 0);
    send(&mut edit, TextEditMsg::InsertChar('X'));

    assert_eq!(buffer_to_string(&edit), "Xhello");
    assert_eq!(cursor(&edit), (0, 1));
}

#[test]
fn test_insert_char_at_middle() {
    let mut edit = test_edit("hello", 0, 2);
    send(&mut edit, TextEditMsg::InsertChar('X'));

    assert_eq!(buffer_to_string(&edit), "heXllo");
    assert_eq!(cursor(&edit), (0, 3));
}

#[test]
fn test_insert_char_at_end() {
    let mut edit = test_edit("hello", 0, 5);
    send(&mut edit, TextEditMsg::InsertChar('X'));

    assert_eq!(buffer_to_string(&edit), "helloX");
    assert_eq!(cursor(&edit), (0, 6));
}

#[test]
fn test_insert_multibyte_chars() {
    let mut edit = test_edit("añb", 0, 2);
    type_str(&mut edit, "é日");

    assert_eq!(buffer_to_string(&edit), "añé日b");
    assert_eq!(cursor(&edit), (0, 4));
}

#[test]
fn test_typing_replaces_selection() {
    let mut edit = test_edit_with_selection("hello world", 0, 0, 0, 5);
    send(&mut edit, TextEditMsg::InsertChar('X'));

    assert_eq!(buffer_to_string(&edit), "X world");
    assert_eq!(cursor(&edit), (0, 1));
    assert!(!edit.is_selection_active());

    // one undo step restores the selected text
    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "hello world");
}

#[test]
fn test_insert_text_replaces_selection() {
    let mut edit = test_edit_with_selection("one two three", 0, 4, 0, 7);
    send(&mut edit, TextEditMsg::InsertText("2\n2".to_string()));

    assert_eq!(buffer_to_string(&edit), "one 2\n2 three");
    assert_eq!(cursor(&edit), (1, 1));
}

#[test]
fn test_readonly_blocks_key_edits() {
    let mut edit = test_edit("hello", 0, 5);
    edit.options_mut().readonly = true;

    type_str(&mut edit, "abc\n");
    send(&mut edit, TextEditMsg::DeleteBackward);
    send(&mut edit, TextEditMsg::InsertText("x".to_string()));
    send(&mut edit, TextEditMsg::Indent);

    assert_eq!(buffer_to_string(&edit), "hello");
    assert_eq!(edit.get_version(), 0);
}

#[test]
fn test_readonly_still_allows_movement_and_copy() {
    let mut edit = test_edit("hello", 0, 0);
    edit.options_mut().readonly = true;
    edit.set_clipboard(Box::new(MemoryClipboard::new()));

    send(&mut edit, TextEditMsg::Move(textedit_engine::editable::MoveTarget::LineEnd));
    assert_eq!(cursor(&edit), (0, 5));
    send(&mut edit, TextEditMsg::SelectAll);
    send(&mut edit, TextEditMsg::Copy);
    send(&mut edit, TextEditMsg::Paste);
    assert_eq!(buffer_to_string(&edit), "hello");
}

// ========================================================================
// Overwrite mode
// ========================================================================

#[test]
fn test_overwrite_replaces_next_char() {
    let mut edit = test_edit("abc", 0, 0);
    send(&mut edit, TextEditMsg::ToggleInsertMode);
    type_str(&mut edit, "XY");

    assert_eq!(buffer_to_string(&edit), "XYc");
    assert_eq!(cursor(&edit), (0, 2));
}

#[test]
fn test_overwrite_at_line_end_appends() {
    let mut edit = test_edit("ab\ncd", 0, 2);
    send(&mut edit, TextEditMsg::ToggleInsertMode);
    send(&mut edit, TextEditMsg::InsertChar('X'));

    assert_eq!(buffer_to_string(&edit), "abX\ncd");
}

#[test]
fn test_overwrite_undoes_per_keystroke() {
    let mut edit = test_edit("abc", 0, 0);
    send(&mut edit, TextEditMsg::ToggleInsertMode);
    type_str(&mut edit, "XY");

    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "Xbc");
    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "abc");
}

// ========================================================================
// Newline tests
// ========================================================================

#[test]
fn test_newline_splits_line() {
    let mut edit = test_edit("hello", 0, 2);
    send(&mut edit, TextEditMsg::InsertNewline);

    assert_eq!(buffer_to_string(&edit), "he\nllo");
    assert_eq!(cursor(&edit), (1, 0));
}

#[test]
fn test_newline_carries_leading_tabs() {
    let mut edit = test_edit("\t\tfoo", 0, 5);
    send(&mut edit, TextEditMsg::InsertNewline);

    assert_eq!(buffer_to_string(&edit), "\t\tfoo\n\t\t");
    assert_eq!(cursor(&edit), (1, 2));
}

#[test]
fn test_newline_after_colon_indents() {
    let mut edit = test_edit("if x:", 0, 5);
    send(&mut edit, TextEditMsg::InsertNewline);

    assert_eq!(buffer_to_string(&edit), "if x:\n\t");
    assert_eq!(cursor(&edit), (1, 1));
}

#[test]
fn test_newline_after_colon_without_auto_indent() {
    let mut edit = test_edit("if x:", 0, 5);
    edit.options_mut().auto_indent = false;
    send(&mut edit, TextEditMsg::InsertNewline);

    assert_eq!(buffer_to_string(&edit), "if x:\n");
}

#[test]
fn test_open_line_below_and_above() {
    let mut edit = test_edit("first\nsecond", 0, 2);
    send(&mut edit, TextEditMsg::OpenLineBelow);
    assert_eq!(buffer_to_string(&edit), "first\n\nsecond");
    assert_eq!(cursor(&edit), (1, 0));

    let mut edit = test_edit("first\nsecond", 1, 3);
    send(&mut edit, TextEditMsg::OpenLineAbove);
    assert_eq!(buffer_to_string(&edit), "first\n\nsecond");
    assert_eq!(cursor(&edit), (1, 0));
}

#[test]
fn test_open_line_above_first_row() {
    let mut edit = test_edit("only", 0, 2);
    send(&mut edit, TextEditMsg::OpenLineAbove);

    assert_eq!(buffer_to_string(&edit), "\nonly");
    assert_eq!(cursor(&edit), (0, 0));
}

// ========================================================================
// Deletion tests
// ========================================================================

#[test]
fn test_backspace_deletes_previous_char() {
    let mut edit = test_edit("hello", 0, 3);
    send(&mut edit, TextEditMsg::DeleteBackward);

    assert_eq!(buffer_to_string(&edit), "helo");
    assert_eq!(cursor(&edit), (0, 2));
}

#[test]
fn test_backspace_joins_lines() {
    let mut edit = test_edit("ab\ncd", 1, 0);
    send(&mut edit, TextEditMsg::DeleteBackward);

    assert_eq!(buffer_to_string(&edit), "abcd");
    assert_eq!(cursor(&edit), (0, 2));
}

#[test]
fn test_backspace_at_document_start_is_noop() {
    let mut edit = test_edit("abc", 0, 0);
    send(&mut edit, TextEditMsg::DeleteBackward);

    assert_eq!(buffer_to_string(&edit), "abc");
    assert!(!edit.history().can_undo());
}

#[test]
fn test_backspace_deletes_selection() {
    let mut edit = test_edit_with_selection("hello\nworld", 0, 3, 1, 2);
    send(&mut edit, TextEditMsg::DeleteBackward);

    assert_eq!(buffer_to_string(&edit), "helrld");
    assert_eq!(cursor(&edit), (0, 3));
}

#[test]
fn test_delete_forward() {
    let mut edit = test_edit("hello", 0, 0);
    send(&mut edit, TextEditMsg::DeleteForward);

    assert_eq!(buffer_to_string(&edit), "ello");
    assert_eq!(cursor(&edit), (0, 0));
}

#[test]
fn test_delete_forward_joins_lines() {
    let mut edit = test_edit("ab\ncd", 0, 2);
    send(&mut edit, TextEditMsg::DeleteForward);

    assert_eq!(buffer_to_string(&edit), "abcd");
}

#[test]
fn test_delete_forward_at_document_end_is_noop() {
    let mut edit = test_edit("ab\ncd", 1, 2);
    send(&mut edit, TextEditMsg::DeleteForward);

    assert_eq!(buffer_to_string(&edit), "ab\ncd");
}

#[test]
fn test_delete_word_backward() {
    let mut edit = test_edit("foo bar", 0, 7);
    send(&mut edit, TextEditMsg::DeleteWordBackward);

    assert_eq!(buffer_to_string(&edit), "foo ");
    assert_eq!(cursor(&edit), (0, 4));
}

#[test]
fn test_delete_word_backward_skips_blank_lines() {
    let mut edit = test_edit("foo bar\n   ", 1, 3);
    send(&mut edit, TextEditMsg::DeleteWordBackward);

    assert_eq!(buffer_to_string(&edit), "foo ");
    assert_eq!(cursor(&edit), (0, 4));
}

#[test]
fn test_delete_word_forward() {
    let mut edit = test_edit("foo bar", 0, 0);
    send(&mut edit, TextEditMsg::DeleteWordForward);

    assert_eq!(buffer_to_string(&edit), " bar");
    assert_eq!(cursor(&edit), (0, 0));
}

// ========================================================================
// Auto brace completion
// ========================================================================

#[test]
fn test_open_brace_inserts_pair() {
    let mut edit = test_edit("", 0, 0);
    edit.options_mut().auto_brace_completion = true;
    send(&mut edit, TextEditMsg::InsertChar('('));

    assert_eq!(buffer_to_string(&edit), "()");
    assert_eq!(cursor(&edit), (0, 1));

    // typing the closing symbol steps over it
    send(&mut edit, TextEditMsg::InsertChar(')'));
    assert_eq!(buffer_to_string(&edit), "()");
    assert_eq!(cursor(&edit), (0, 2));
}

#[test]
fn test_brace_before_word_inserts_single() {
    let mut edit = test_edit("foo", 0, 0);
    edit.options_mut().auto_brace_completion = true;
    send(&mut edit, TextEditMsg::InsertChar('['));

    assert_eq!(buffer_to_string(&edit), "[foo");
}

#[test]
fn test_quote_after_word_inserts_single() {
    let mut edit = test_edit("it", 0, 2);
    edit.options_mut().auto_brace_completion = true;
    send(&mut edit, TextEditMsg::InsertChar('\''));

    assert_eq!(buffer_to_string(&edit), "it'");
}

#[test]
fn test_backspace_removes_auto_pair() {
    let mut edit = test_edit("x = ", 0, 4);
    edit.options_mut().auto_brace_completion = true;
    send(&mut edit, TextEditMsg::InsertChar('{'));
    assert_eq!(buffer_to_string(&edit), "x = {}");

    send(&mut edit, TextEditMsg::DeleteBackward);
    assert_eq!(buffer_to_string(&edit), "x = ");
    assert_eq!(cursor(&edit), (0, 4));
}

#[test]
fn test_brace_wraps_selection_as_one_step() {
    let mut edit = test_edit_with_selection("call foo now", 0, 5, 0, 8);
    edit.options_mut().auto_brace_completion = true;
    send(&mut edit, TextEditMsg::InsertChar('('));

    assert_eq!(buffer_to_string(&edit), "call (foo) now");
    assert_eq!(cursor(&edit), (0, 9));

    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "call foo now");
}

// ========================================================================
// Indentation
// ========================================================================

#[test]
fn test_tab_inserts_tab() {
    let mut edit = test_edit("ab", 0, 1);
    send(&mut edit, TextEditMsg::Indent);

    assert_eq!(buffer_to_string(&edit), "a\tb");
    assert_eq!(cursor(&edit), (0, 2));
}

#[test]
fn test_back_tab_removes_tab_before_caret() {
    let mut edit = test_edit("\tab", 0, 1);
    send(&mut edit, TextEditMsg::Unindent);

    assert_eq!(buffer_to_string(&edit), "ab");
    assert_eq!(cursor(&edit), (0, 0));
}

#[test]
fn test_back_tab_without_tab_is_noop() {
    let mut edit = test_edit("ab", 0, 1);
    send(&mut edit, TextEditMsg::Unindent);

    assert_eq!(buffer_to_string(&edit), "ab");
}

#[test]
fn test_indent_selection_is_one_undo_step() {
    let mut edit = test_edit_with_selection("a\nb\nc", 0, 0, 2, 1);
    send(&mut edit, TextEditMsg::Indent);

    assert_eq!(buffer_to_string(&edit), "\ta\n\tb\n\tc");
    assert_eq!(edit.get_selection_text(), "\ta\n\tb\n\tc");

    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "a\nb\nc");
}

#[test]
fn test_indent_selection_ending_at_column_zero_skips_last_row() {
    let mut edit = test_edit_with_selection("a\nb\nc", 0, 0, 2, 0);
    send(&mut edit, TextEditMsg::Indent);

    assert_eq!(buffer_to_string(&edit), "\ta\n\tb\nc");
}

#[test]
fn test_unindent_selection_strips_tabs_and_spaces() {
    let mut edit = test_edit_with_selection("\ta\n    b\nc", 0, 0, 2, 1);
    send(&mut edit, TextEditMsg::Unindent);

    assert_eq!(buffer_to_string(&edit), "a\nb\nc");
    assert!(edit.is_selection_active());

    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "\ta\n    b\nc");
}

// ========================================================================
// Clipboard
// ========================================================================

#[test]
fn test_copy_paste_selection() {
    let mut edit = test_edit_with_selection("hello world", 0, 0, 0, 5);
    send(&mut edit, TextEditMsg::Copy);
    send(&mut edit, TextEditMsg::Move(textedit_engine::editable::MoveTarget::LineEnd));
    send(&mut edit, TextEditMsg::Paste);

    assert_eq!(buffer_to_string(&edit), "hello worldhello");
    assert_eq!(cursor(&edit), (0, 16));
}

#[test]
fn test_cut_selection() {
    let mut edit = test_edit_with_selection("hello world", 0, 5, 0, 11);
    send(&mut edit, TextEditMsg::Cut);
    assert_eq!(buffer_to_string(&edit), "hello");

    send(&mut edit, TextEditMsg::Move(textedit_engine::editable::MoveTarget::LineStart));
    send(&mut edit, TextEditMsg::Paste);
    assert_eq!(buffer_to_string(&edit), " worldhello");
}

#[test]
fn test_cut_line_and_paste_as_full_line() {
    let mut edit = test_edit("one\ntwo\nthree", 1, 1);
    send(&mut edit, TextEditMsg::Cut);
    assert_eq!(buffer_to_string(&edit), "one\nthree");

    // the cut row comes back above the caret row, whatever the caret column
    send(&mut edit, TextEditMsg::Paste);
    assert_eq!(buffer_to_string(&edit), "one\ntwo\nthree");
}

#[test]
fn test_cut_line_is_one_undo_step() {
    let mut edit = test_edit("one\ntwo\nthree", 1, 1);
    send(&mut edit, TextEditMsg::Cut);
    send(&mut edit, TextEditMsg::Undo);

    assert_eq!(buffer_to_string(&edit), "one\ntwo\nthree");
}

#[test]
fn test_paste_over_selection_is_one_undo_step() {
    let mut edit = test_edit_with_selection("abc def", 0, 4, 0, 7);
    edit.set_clipboard(Box::new(MemoryClipboard::with_text("xyz")));
    send(&mut edit, TextEditMsg::Paste);
    assert_eq!(buffer_to_string(&edit), "abc xyz");

    send(&mut edit, TextEditMsg::Undo);
    assert_eq!(buffer_to_string(&edit), "abc def");
}

// ========================================================================
// Case conversion
// ========================================================================

#[test]
fn test_convert_case_upper_and_lower() {
    let mut edit = test_edit_with_selection("Hello World", 0, 0, 0, 5);
    send(&mut edit, TextEditMsg::ConvertCase(Case::Upper));
    assert_eq!(buffer_to_string(&edit), "HELLO World");

    edit.select(0, 6, 0, 11);
    send(&mut edit, TextEditMsg::ConvertCase(Case::Lower));
    assert_eq!(buffer_to_string(&edit), "HELLO world");
}

#[test]
fn test_convert_case_without_selection_is_noop() {
    let mut edit = test_edit("Hello", 0, 0);
    send(&mut edit, TextEditMsg::ConvertCase(Case::Upper));
    assert_eq!(buffer_to_string(&edit), "Hello");
}
