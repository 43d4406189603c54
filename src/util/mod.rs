//! Utility modules

pub mod file_validation;
pub mod text;

pub use file_validation::{read_document, FileOpenError};
pub use text::{char_type, is_completable, is_symbol, is_text_char, CharType};
