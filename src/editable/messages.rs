//! Message types fed to [`crate::update::update_text_edit`].

use super::editing::Case;
use super::pointer::PointerEvent;

/// Where a caret motion goes. The same targets serve plain and shift-extended moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Left,
    Right,
    /// Previous row, column re-derived from `last_fit_x`
    Up,
    Down,
    /// First non-blank column, or column 0 when already there
    LineStart,
    LineEnd,
    /// Previous word boundary, crossing into the row above at column 0
    WordLeft,
    WordRight,
    DocumentStart,
    DocumentEnd,
    /// By the number of visible rows
    PageUp,
    PageDown,
}

/// Host input translated into engine operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditMsg {
    // === Movement ===
    /// Plain motion; drops the selection first
    Move(MoveTarget),
    /// Shift+motion; grows the selection from its anchor
    MoveWithSelection(MoveTarget),

    // === Insertion ===
    /// A printable key (brace pairing and overwrite apply)
    InsertChar(char),
    /// Bulk insert at the caret, replacing the selection
    InsertText(String),
    /// Enter
    InsertNewline,
    /// Ctrl+Enter
    OpenLineBelow,
    /// Ctrl+Shift+Enter
    OpenLineAbove,
    /// Tab
    Indent,
    /// Shift+Tab
    Unindent,

    // === Deletion ===
    /// Backspace
    DeleteBackward,
    /// Delete
    DeleteForward,
    /// Ctrl+Backspace
    DeleteWordBackward,
    /// Ctrl+Delete
    DeleteWordForward,

    // === Selection ===
    SelectAll,
    /// Escape
    Cancel,

    // === Clipboard ===
    Copy,
    Cut,
    Paste,

    // === History ===
    Undo,
    Redo,

    // === Modes and transforms ===
    ToggleInsertMode,
    ConvertCase(Case),

    // === Completion ===
    /// Ctrl+Space
    QueryCompletion,

    // === Pointer ===
    PointerDown(PointerEvent),
    PointerDrag { x: usize, y: usize },
    /// Wheel notches, positive scrolls down
    Wheel(isize),

    // === Viewport ===
    /// Ctrl+Up
    ScrollLinesUp,
    /// Ctrl+Down
    ScrollLinesDown,
    CenterViewport,
    Resize { width: usize, height: usize },
}

impl TextEditMsg {
    /// Whether handling this message can change the document.
    pub fn mutates_text(&self) -> bool {
        use TextEditMsg::*;
        matches!(
            self,
            InsertChar(_)
                | InsertText(_)
                | InsertNewline
                | OpenLineBelow
                | OpenLineAbove
                | Indent
                | Unindent
                | DeleteBackward
                | DeleteForward
                | DeleteWordBackward
                | DeleteWordForward
                | Cut
                | Paste
                | Undo
                | Redo
                | ConvertCase(_)
        )
    }

    /// Messages that only move the viewport. These never close the completion popup.
    pub fn is_viewport_only(&self) -> bool {
        use TextEditMsg::*;
        matches!(
            self,
            Wheel(_) | ScrollLinesUp | ScrollLinesDown | CenterViewport | Resize { .. }
        )
    }
}
