//! Caret position and scroll offsets.

use serde::{Deserialize, Serialize};

/// A position in the text buffer (line and column, both 0-indexed, columns in chars).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self::new(line, column)
    }
}

/// The caret plus the viewport offsets derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
    /// Pixel x the caret last targeted horizontally. Vertical moves keep it so the
    /// caret returns to the same visual column after crossing a short line.
    pub last_fit_x: usize,
    /// Horizontal scroll in pixels
    pub x_ofs: usize,
    /// First visible row
    pub line_ofs: usize,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            last_fit_x: 0,
            x_ofs: 0,
            line_ofs: 0,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
