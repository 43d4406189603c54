//! The multi-line text editing engine.
//!
//! A [`TextEdit`] owns a line buffer, one caret, one selection, the undo history
//! and the completion session. Hosts feed it input through
//! [`crate::update::update_text_edit`] (or call the command methods directly) and
//! drain [`EditorEvent`]s afterwards.
//!
//! # Architecture
//!
//! - [`LineBuffer`] / [`TextBuffer`]: lines with cached pixel widths, markers and
//!   color-region state
//! - [`EditHistory`]: versioned undo log with typing coalescence and chained groups
//! - [`Selection`] / [`Cursor`]: normalized range and caret with viewport offsets
//! - [`CompletionSession`]: candidate ranking and popup navigation
//! - [`Notifier`]: deferred, coalesced host notifications
//! - [`TextEditMsg`]: host input translated into engine operations
//!
//! # Example
//!
//! ```
//! use textedit_engine::editable::{Position, TextEdit};
//!
//! let mut edit = TextEdit::from_text("hello");
//! edit.set_cursor_position(Position::new(0, 5));
//! edit.type_char('!');
//! assert_eq!(edit.get_text(), "hello!");
//!
//! edit.undo();
//! assert_eq!(edit.get_text(), "hello");
//! ```

mod buffer;
mod clipboard;
mod completion;
mod cursor;
mod editing;
mod history;
mod messages;
mod metrics;
mod navigation;
mod notify;
mod options;
mod pointer;
mod search;
mod selection;
mod state;

pub use buffer::{ColorRegion, Line, LineBuffer, RegionError, RegionInfo, RegionSpan, TextBuffer};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use completion::{
    is_subsequence_ci, rank_candidates, CompletionSession, ScoredOption, PREFIX_SCORE,
};
pub use cursor::{Cursor, Position};
pub use editing::Case;
pub use history::{EditHistory, EditOperation, OpKind};
pub use messages::{MoveTarget, TextEditMsg};
pub use metrics::{FontLoadError, FontMetrics, FontdueMetrics, Measure, MonospaceMetrics};
pub use navigation::{ViewportSize, CARET_MARGIN};
pub use notify::{EditorEvent, Notifier};
pub use options::EditOptions;
pub use pointer::{PointerArea, PointerEvent, WHEEL_ROWS};
pub use search::{line_matches, search, SearchFlags, SearchState};
pub use selection::{SelectingMode, Selection};
pub use state::{EditError, TextEdit, CURSOR_MARKER};
