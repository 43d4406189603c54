//! Update function for the text editing engine
//!
//! All host input flows through [`update_text_edit`]. While the completion popup
//! is open it gets first refusal on navigation and confirm keys; everything else
//! closes it and falls through to normal handling.

use tracing::{debug, span, trace, Level};

use crate::editable::{MoveTarget, TextEdit, TextEditMsg};
use crate::tracing::CursorSnapshot;

/// Apply one message to the engine.
///
/// Returns true when the engine has notifications for the host to drain.
pub fn update_text_edit(edit: &mut TextEdit, msg: TextEditMsg) -> bool {
    let _span = span!(Level::TRACE, "update_text_edit", msg = ?msg).entered();
    if edit.options().readonly && msg.mutates_text() {
        trace!("readonly, ignoring {:?}", msg);
        return edit.has_pending_events();
    }
    let before = CursorSnapshot::from_edit(edit);

    let consumed = edit.is_completion_active() && update_completion(edit, &msg);
    if !consumed {
        update_inner(edit, msg);
    }

    let after = CursorSnapshot::from_edit(edit);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "cursor", %diff, "state changed");
    }

    edit.has_pending_events()
}

/// Keys the completion popup handles itself. Returns false when the message
/// should go through normal handling.
fn update_completion(edit: &mut TextEdit, msg: &TextEditMsg) -> bool {
    match msg {
        TextEditMsg::Move(MoveTarget::Up) => edit.completion_select_previous(),
        TextEditMsg::Move(MoveTarget::Down) => edit.completion_select_next(),
        TextEditMsg::Move(MoveTarget::PageUp) => edit.completion_page_up(),
        TextEditMsg::Move(MoveTarget::PageDown) => edit.completion_page_down(),
        TextEditMsg::Move(MoveTarget::LineStart) => edit.completion_select_first(),
        TextEditMsg::Move(MoveTarget::LineEnd) => edit.completion_select_last(),
        TextEditMsg::InsertNewline | TextEditMsg::Indent => edit.confirm_completion(),
        TextEditMsg::DeleteBackward => {
            edit.backspace_at_cursor();
            edit.update_completion_candidates();
        }
        TextEditMsg::InsertChar(ch) => {
            edit.type_char(*ch);
            edit.update_completion_candidates();
        }
        TextEditMsg::Cancel => edit.cancel_code_completion(),
        _ if msg.is_viewport_only() => return false,
        _ => {
            trace!("completion closed by {:?}", msg);
            edit.cancel_code_completion();
            return false;
        }
    }
    true
}

fn update_inner(edit: &mut TextEdit, msg: TextEditMsg) {
    match msg {
        // === Movement ===
        TextEditMsg::Move(target) => apply_move(edit, target, false),
        TextEditMsg::MoveWithSelection(target) => apply_move(edit, target, true),

        // === Insertion ===
        TextEditMsg::InsertChar(ch) => edit.type_char(ch),
        TextEditMsg::InsertText(text) => edit.insert_text_at_cursor(&text),
        TextEditMsg::InsertNewline => edit.newline(),
        TextEditMsg::OpenLineBelow => edit.open_line_below(),
        TextEditMsg::OpenLineAbove => edit.open_line_above(),
        TextEditMsg::Indent => edit.tab(),
        TextEditMsg::Unindent => edit.back_tab(),

        // === Deletion ===
        TextEditMsg::DeleteBackward => edit.backspace(),
        TextEditMsg::DeleteForward => edit.delete_forward(),
        TextEditMsg::DeleteWordBackward => edit.delete_word_backward(),
        TextEditMsg::DeleteWordForward => edit.delete_word_forward(),

        // === Selection ===
        TextEditMsg::SelectAll => edit.select_all(),
        TextEditMsg::Cancel => {
            edit.cancel_code_hint();
            edit.reset_selection();
        }

        // === Clipboard ===
        TextEditMsg::Copy => edit.copy(),
        TextEditMsg::Cut => edit.cut(),
        TextEditMsg::Paste => edit.paste(),

        // === History ===
        TextEditMsg::Undo => {
            edit.undo();
        }
        TextEditMsg::Redo => {
            edit.redo();
        }

        // === Modes and transforms ===
        TextEditMsg::ToggleInsertMode => edit.toggle_insert_mode(),
        TextEditMsg::ConvertCase(case) => edit.convert_case(case),

        // === Completion ===
        TextEditMsg::QueryCompletion => {
            edit.query_code_completion();
        }

        // === Pointer ===
        TextEditMsg::PointerDown(event) => edit.pointer_down(event),
        TextEditMsg::PointerDrag { x, y } => edit.pointer_drag(x, y),
        TextEditMsg::Wheel(notches) => edit.pointer_wheel(notches),

        // === Viewport ===
        TextEditMsg::ScrollLinesUp => edit.scroll_lines_up(),
        TextEditMsg::ScrollLinesDown => edit.scroll_lines_down(),
        TextEditMsg::CenterViewport => edit.center_viewport_to_cursor(),
        TextEditMsg::Resize { width, height } => edit.set_viewport_size(width, height),
    }
}

/// Apply movement to the engine. Vertical and line-edge moves also drop the
/// call-signature hint.
fn apply_move(edit: &mut TextEdit, target: MoveTarget, extend: bool) {
    match target {
        MoveTarget::Left => edit.move_left(extend),
        MoveTarget::Right => edit.move_right(extend),
        MoveTarget::WordLeft => edit.move_word_left(extend),
        MoveTarget::WordRight => edit.move_word_right(extend),
        MoveTarget::DocumentStart => edit.move_document_start(extend),
        MoveTarget::DocumentEnd => edit.move_document_end(extend),
        MoveTarget::Up => {
            edit.cancel_code_hint();
            edit.move_up(extend);
        }
        MoveTarget::Down => {
            edit.cancel_code_hint();
            edit.move_down(extend);
        }
        MoveTarget::LineStart => {
            edit.cancel_code_hint();
            edit.move_line_start(extend);
        }
        MoveTarget::LineEnd => {
            edit.cancel_code_hint();
            edit.move_line_end(extend);
        }
        MoveTarget::PageUp => {
            edit.cancel_code_hint();
            edit.move_page_up(extend);
        }
        MoveTarget::PageDown => {
            edit.cancel_code_hint();
            edit.move_page_down(extend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::{EditorEvent, Position};
    use pretty_assertions::assert_eq;

    fn completing(text: &str, candidates: &[&str]) -> TextEdit {
        let mut edit = TextEdit::from_text(text);
        let end = edit.get_line(0).chars().count();
        edit.set_cursor_position(Position::new(0, end));
        edit.code_complete(candidates.iter().map(|s| s.to_string()).collect());
        edit
    }

    #[test]
    fn test_typing_through_update() {
        let mut edit = TextEdit::default();
        for ch in "abc".chars() {
            update_text_edit(&mut edit, TextEditMsg::InsertChar(ch));
        }
        assert_eq!(edit.get_text(), "abc");
        assert!(edit.has_pending_events());
        assert!(edit.drain_events().contains(&EditorEvent::TextChanged));
        assert!(!edit.has_pending_events());
    }

    #[test]
    fn test_move_with_selection() {
        let mut edit = TextEdit::from_text("hello");
        update_text_edit(&mut edit, TextEditMsg::MoveWithSelection(MoveTarget::LineEnd));
        assert_eq!(edit.get_selection_text(), "hello");
        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Left));
        assert!(!edit.is_selection_active());
    }

    #[test]
    fn test_completion_navigation_takes_priority() {
        let mut edit = completing("fo", &["foo", "fob", "zap"]);
        assert!(edit.is_completion_active());
        let first = edit.completion().index;

        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Down));
        assert!(edit.is_completion_active());
        assert_eq!(edit.completion().index, first + 1);
        assert_eq!(edit.cursor_position(), Position::new(0, 2));

        update_text_edit(&mut edit, TextEditMsg::InsertNewline);
        assert!(!edit.is_completion_active());
        assert_eq!(edit.get_line_count(), 1);
    }

    #[test]
    fn test_escape_only_closes_completion() {
        let mut edit = completing("fo", &["foo", "fob"]);
        edit.set_code_hint("fn foo()");
        update_text_edit(&mut edit, TextEditMsg::Cancel);
        assert!(!edit.is_completion_active());
        assert_eq!(edit.code_hint(), "fn foo()");

        update_text_edit(&mut edit, TextEditMsg::Cancel);
        assert_eq!(edit.code_hint(), "");
    }

    #[test]
    fn test_other_keys_close_completion_and_run() {
        let mut edit = completing("fo", &["foo", "fob"]);
        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Left));
        assert!(!edit.is_completion_active());
        assert_eq!(edit.cursor_position(), Position::new(0, 1));
    }

    #[test]
    fn test_wheel_keeps_completion_open() {
        let mut edit = completing("fo", &["foo", "fob"]);
        update_text_edit(&mut edit, TextEditMsg::Wheel(1));
        assert!(edit.is_completion_active());
    }

    #[test]
    fn test_readonly_blocks_undo() {
        let mut edit = TextEdit::from_text("abc");
        edit.set_cursor_position(Position::new(0, 3));
        update_text_edit(&mut edit, TextEditMsg::InsertChar('d'));
        edit.options_mut().readonly = true;
        update_text_edit(&mut edit, TextEditMsg::Undo);
        update_text_edit(&mut edit, TextEditMsg::InsertChar('e'));
        assert_eq!(edit.get_text(), "abcd");
    }

    #[test]
    fn test_readonly_ignores_every_edit_message() {
        let mut edit = TextEdit::from_text("abc\ndef");
        edit.set_cursor_position(Position::new(0, 3));
        update_text_edit(&mut edit, TextEditMsg::InsertChar('x'));
        edit.options_mut().readonly = true;
        edit.drain_events();

        let msgs = [
            TextEditMsg::InsertText("zz".to_string()),
            TextEditMsg::InsertNewline,
            TextEditMsg::DeleteBackward,
            TextEditMsg::Cut,
            TextEditMsg::Paste,
            TextEditMsg::Undo,
        ];
        for msg in msgs {
            assert!(!update_text_edit(&mut edit, msg));
        }
        assert_eq!(edit.get_text(), "abcx\ndef");

        // navigation still works
        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Down));
        assert_eq!(edit.cursor_position(), Position::new(1, 3));
    }

    #[test]
    fn test_vertical_move_cancels_hint() {
        let mut edit = TextEdit::from_text("a\nb");
        edit.set_code_hint("hint");
        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Right));
        assert_eq!(edit.code_hint(), "hint");
        update_text_edit(&mut edit, TextEditMsg::Move(MoveTarget::Down));
        assert_eq!(edit.code_hint(), "");
    }
}
