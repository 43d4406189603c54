//! textedit-engine - the editing engine behind a multi-line text widget
//!
//! This crate provides the buffer, caret, selection, undo history, search and
//! completion logic of a code-editing text widget, with no rendering of its own.
//! Hosts translate input into [`TextEditMsg`] values, run them through
//! [`update_text_edit`] and drain [`EditorEvent`]s.

pub mod config;
pub mod config_paths;
pub mod editable;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editable::{EditorEvent, Position, TextEdit, TextEditMsg};
pub use update::update_text_edit;
