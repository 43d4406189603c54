//! Character classes and char-indexed string helpers
//!
//! Columns throughout the engine count `char`s, not bytes. The helpers here do the
//! conversion so the rest of the crate never slices a `String` by byte offset.

/// Character type for word navigation, double-click selection and whole-word search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters and underscore
    WordChar,
    /// Everything else
    Punctuation,
}

/// The single word predicate used by every word-aware operation.
#[inline]
pub fn is_text_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Get the character type for word navigation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_text_char(ch) {
        CharType::WordChar
    } else {
        CharType::Punctuation
    }
}

/// ASCII symbols plus space and tab. Region delimiters must start with one of these,
/// and they terminate a completion prefix.
pub fn is_symbol(ch: char) -> bool {
    ch != '_'
        && matches!(ch, '!'..='/' | ':'..='@' | '['..='`' | '{'..='~' | '\t' | ' ')
}

/// Characters that may be part of a completion prefix.
pub fn is_completable(ch: char) -> bool {
    !is_symbol(ch) || ch == '"' || ch == '\''
}

/// Closing partner for the auto-paired symbols.
pub fn closing_pair(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// True if `ch` closes one of the auto-paired symbols.
pub fn is_closing_pair(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}' | '"' | '\'')
}

/// Number of chars in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of char column `col`, clamped to the end of the string.
pub fn byte_offset(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(idx, _)| idx)
}

/// The char at column `col`, if any.
#[inline]
pub fn char_at(s: &str, col: usize) -> Option<char> {
    s.chars().nth(col)
}

/// Substring between two char columns (clamped).
pub fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(s, start);
    let end_byte = byte_offset(s, end.max(start));
    &s[start_byte..end_byte]
}

/// Split at a char column (clamped).
pub fn split_at_char(s: &str, col: usize) -> (&str, &str) {
    s.split_at(byte_offset(s, col))
}

/// Leading tab characters, used for indentation carry-over on newline.
pub fn leading_tabs(s: &str) -> usize {
    s.chars().take_while(|&c| c == '\t').count()
}

/// Leading whitespace characters (smart home target).
pub fn leading_whitespace(s: &str) -> usize {
    s.chars().take_while(|c| c.is_whitespace()).count()
}
