//! Wrap-around text search.
//!
//! Matching works on `char`s, so returned columns are character indices like every
//! other column in the engine.

use bitflags::bitflags;

use crate::util::text::is_text_char;

use super::buffer::TextBuffer;
use super::cursor::Position;
use super::state::TextEdit;

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct SearchFlags: u32 {
        const MATCH_CASE = 1;
        const WHOLE_WORDS = 2;
        const BACKWARDS = 4;
    }
}

/// Search text and flags remembered for highlight-all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub text: String,
    pub flags: SearchFlags,
}

fn chars_equal(a: char, b: char, match_case: bool) -> bool {
    a == b || (!match_case && a.to_lowercase().eq(b.to_lowercase()))
}

/// Raw substring match of `key` in `line` starting at or after `from`.
fn find_from(line: &[char], key: &[char], from: usize, match_case: bool) -> Option<usize> {
    if key.len() > line.len() {
        return None;
    }
    (from..=line.len() - key.len()).find(|&start| {
        line[start..start + key.len()]
            .iter()
            .zip(key)
            .all(|(&a, &b)| chars_equal(a, b, match_case))
    })
}

fn is_whole_word(line: &[char], start: usize, len: usize) -> bool {
    let before_ok = start == 0 || !is_text_char(line[start - 1]);
    let after_ok = line.get(start + len).is_none_or(|&c| !is_text_char(c));
    before_ok && after_ok
}

/// Next accepted match at or after `from`. A rejected whole-word candidate moves
/// the scan one character on.
fn next_match(line: &[char], key: &[char], from: usize, flags: SearchFlags) -> Option<usize> {
    let match_case = flags.contains(SearchFlags::MATCH_CASE);
    let mut from = from;
    while let Some(start) = find_from(line, key, from, match_case) {
        if !flags.contains(SearchFlags::WHOLE_WORDS) || is_whole_word(line, start, key.len()) {
            return Some(start);
        }
        from = start + 1;
    }
    None
}

/// Every non-overlapping occurrence of `key` in `text`, honoring `MATCH_CASE` and
/// `WHOLE_WORDS`. `BACKWARDS` is ignored.
pub fn line_matches(text: &str, key: &str, flags: SearchFlags) -> Vec<usize> {
    let line: Vec<char> = text.chars().collect();
    let key: Vec<char> = key.chars().collect();
    if key.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut from = 0;
    while let Some(start) = next_match(&line, &key, from, flags) {
        out.push(start);
        from = start + key.len();
    }
    out
}

/// Find `key` starting at `(from_line, from_col)`, wrapping around the document once.
///
/// Forward search returns the first match at or after the start column; backward
/// search the last match at or before it. The starting line is scanned again at the
/// end (from its other edge) so matches before the start are still found.
pub fn search<B: TextBuffer + ?Sized>(
    buffer: &B,
    key: &str,
    flags: SearchFlags,
    from_line: usize,
    from_col: usize,
) -> Option<Position> {
    let count = buffer.line_count();
    if key.is_empty() || from_line >= count {
        return None;
    }
    let key: Vec<char> = key.chars().collect();
    let backwards = flags.contains(SearchFlags::BACKWARDS);

    let mut line_idx = from_line;
    for step in 0..=count {
        let line: Vec<char> = buffer.line(line_idx).chars().collect();
        let from_column = if line_idx == from_line && step < count {
            from_col.min(line.len())
        } else if backwards {
            line.len()
        } else {
            0
        };

        let found = if backwards {
            let mut last = None;
            let mut from = 0;
            while let Some(start) = next_match(&line, &key, from, flags) {
                if start > from_column {
                    break;
                }
                last = Some(start);
                from = start + key.len();
            }
            last
        } else {
            next_match(&line, &key, from_column, flags)
        };

        if let Some(column) = found {
            return Some(Position::new(line_idx, column));
        }

        line_idx = if backwards {
            line_idx.checked_sub(1).unwrap_or(count - 1)
        } else if line_idx + 1 == count {
            0
        } else {
            line_idx + 1
        };
    }
    None
}

impl TextEdit {
    pub fn search(
        &self,
        key: &str,
        flags: SearchFlags,
        from_line: usize,
        from_col: usize,
    ) -> Option<Position> {
        let found = search(&self.text, key, flags, from_line, from_col);
        tracing::debug!(key, ?flags, from_line, from_col, ?found, "search");
        found
    }

    /// Search from the caret and select the match.
    pub fn find_next(&mut self, key: &str, flags: SearchFlags) -> bool {
        let mut from = self.cursor.position();
        if !flags.contains(SearchFlags::BACKWARDS) && self.selection.active {
            from = self.selection.to();
        } else if self.selection.active {
            from = self.selection.from();
            if from.column == 0 && from.line > 0 {
                from = Position::new(from.line - 1, self.text.line_length(from.line - 1));
            } else {
                from.column = from.column.saturating_sub(1);
            }
        }

        let Some(found) = self.search(key, flags, from.line, from.column) else {
            return false;
        };
        let end = found.column + key.chars().count();
        self.cursor_set_line(found.line, false);
        self.cursor_set_column(end, true);
        self.select(found.line, found.column, found.line, end);
        true
    }

    /// Remember the text to highlight on every visible line.
    pub fn set_search_text(&mut self, text: &str) {
        self.search.text = text.to_string();
        self.notifier.redraw();
    }

    pub fn set_search_flags(&mut self, flags: SearchFlags) {
        self.search.flags = flags;
        self.notifier.redraw();
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Start columns of the remembered search text on `line`.
    pub fn search_occurrences(&self, line: usize) -> Vec<usize> {
        if line >= self.text.len() {
            return Vec::new();
        }
        line_matches(self.text.line(line), &self.search.text, self.search.flags)
    }
}
