//! Selection range and the gesture state that produces it.

use super::cursor::Position;

/// What is currently extending the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectingMode {
    #[default]
    None,
    /// Mouse drag in progress (or finished without a new click)
    Pointer,
    /// Shift + movement
    Shift,
}

/// The single selection range.
///
/// `from`/`to` are always normalized (`from <= to`) while active. The
/// `selecting_*` anchor is where the gesture started, which may be either end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub active: bool,
    pub from_line: usize,
    pub from_col: usize,
    pub to_line: usize,
    pub to_col: usize,
    pub selecting_mode: SelectingMode,
    pub selecting_line: usize,
    pub selecting_col: usize,
    /// The anchor is the left end (`from`), so the caret is at `to`.
    pub shiftclick_left: bool,
}

impl Selection {
    pub fn from(&self) -> Position {
        Position::new(self.from_line, self.from_col)
    }

    pub fn to(&self) -> Position {
        Position::new(self.to_line, self.to_col)
    }

    pub fn anchor(&self) -> Position {
        Position::new(self.selecting_line, self.selecting_col)
    }

    /// Store a range, swapping the ends if needed. Returns true if they were swapped.
    pub fn set_range(&mut self, a: Position, b: Position) -> bool {
        let (from, to, swapped) = if a <= b { (a, b, false) } else { (b, a, true) };
        self.from_line = from.line;
        self.from_col = from.column;
        self.to_line = to.line;
        self.to_col = to.column;
        self.active = from != to;
        swapped
    }

    /// Record the gesture anchor.
    pub fn set_anchor(&mut self, pos: Position) {
        self.selecting_line = pos.line;
        self.selecting_col = pos.column;
    }

    /// Is `pos` inside the active range (end exclusive)?
    pub fn contains(&self, pos: Position) -> bool {
        self.active && self.from() <= pos && pos < self.to()
    }

    /// Deactivate and leave any gesture.
    pub fn clear(&mut self) {
        self.active = false;
        self.selecting_mode = SelectingMode::None;
    }
}
