//! Identifier completion: prefix extraction, candidate ranking and the popup session.
//!
//! The host supplies candidates through [`TextEdit::code_complete`], usually in
//! response to [`EditorEvent::RequestCompletion`]. The session re-ranks after every
//! typed character or backspace until it is confirmed or cancelled.

use serde::Serialize;

use crate::util::text::is_completable;

use super::buffer::TextBuffer;
use super::notify::EditorEvent;
use super::state::TextEdit;

/// Score given to candidates that start with the typed prefix (case-insensitive).
/// Higher than any similarity score.
pub const PREFIX_SCORE: f64 = 1.1;

/// A ranked completion option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredOption {
    pub text: String,
    pub score: f64,
}

/// Completion popup state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionSession {
    pub active: bool,
    /// Candidates supplied by the host
    pub candidates: Vec<String>,
    /// Filtered candidates, best first
    pub options: Vec<String>,
    /// Text left of the caret being completed
    pub base: String,
    pub index: usize,
    /// Call hint shown next to the caret, empty when none
    pub hint: String,
}

impl CompletionSession {
    pub fn current(&self) -> Option<&str> {
        self.options.get(self.index).map(String::as_str)
    }

    fn last_index(&self) -> usize {
        self.options.len().saturating_sub(1)
    }

    pub fn select_previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        self.index = (self.index + 1).min(self.last_index());
    }

    pub fn page_up(&mut self, lines: usize) {
        self.index = self.index.saturating_sub(lines);
    }

    pub fn page_down(&mut self, lines: usize) {
        self.index = self.index.saturating_add(lines).min(self.last_index());
    }

    pub fn select_first(&mut self) {
        self.index = 0;
    }

    pub fn select_last(&mut self) {
        self.index = self.last_index();
    }
}

/// Case-insensitive subsequence test: every char of `needle` appears in `haystack`
/// in order.
pub fn is_subsequence_ci(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| hay.any(|h| h == n))
}

/// Filter and order `candidates` for the typed `base`.
///
/// Returns `None` when a candidate equals `base` exactly (nothing left to complete).
/// Candidates starting with `base` score [`PREFIX_SCORE`], the rest their bigram
/// similarity. Equal scores keep the order the candidates were supplied in.
pub fn rank_candidates(base: &str, candidates: &[String]) -> Option<Vec<ScoredOption>> {
    let base_lower = base.to_lowercase();
    let mut options: Vec<ScoredOption> = Vec::new();

    for candidate in candidates {
        if candidate == base {
            return None;
        }
        if !is_subsequence_ci(base, candidate) {
            continue;
        }
        // with no input every entry is listed, duplicates included
        if !base.is_empty() && options.iter().any(|o| o.text == *candidate) {
            continue;
        }

        let lower = candidate.to_lowercase();
        let score = if lower.starts_with(&base_lower) {
            PREFIX_SCORE
        } else {
            strsim::sorensen_dice(&base_lower, &lower)
        };
        let pos = options.partition_point(|o| o.score >= score);
        options.insert(
            pos,
            ScoredOption {
                text: candidate.clone(),
                score,
            },
        );
    }
    Some(options)
}

/// What sits left of the caret, as far as completion cares.
#[derive(Debug, Default, PartialEq, Eq)]
struct PrefixScan {
    base: String,
    /// Caret follows `keyword ` for a configured keyword
    pre_keyword: bool,
    /// Caret right after a closing quote
    cancel: bool,
    /// Character before the prefix
    char_before: Option<char>,
}

fn scan_prefix(line: &[char], col: usize, keywords: &[String]) -> PrefixScan {
    let col = col.min(line.len());
    let is_quote = |c: char| c == '"' || c == '\'';

    let mut in_quote = false;
    let mut last_quote = None;
    for i in (0..col).rev() {
        if is_quote(line[i]) {
            in_quote = !in_quote;
            last_quote.get_or_insert(i);
        }
    }

    let mut scan = PrefixScan {
        cancel: !in_quote && last_quote == col.checked_sub(1),
        ..Default::default()
    };

    match last_quote {
        Some(quote) if in_quote => {
            scan.base = line[quote..col].iter().collect();
            scan.char_before = col.checked_sub(1).map(|i| line[i]);
        }
        _ if col > 0 && line[col - 1] == ' ' => {
            let mut k = col;
            while k > 0 && line[k - 1] == ' ' {
                k -= 1;
            }
            let end = k;
            while k > 0 && line[k - 1] > ' ' && is_completable(line[k - 1]) {
                k -= 1;
            }
            let keyword: String = line[k..end].iter().collect();
            scan.pre_keyword = keywords.contains(&keyword);
            scan.char_before = Some(' ');
        }
        _ => {
            let mut start = col;
            let mut stopped_at_quote = false;
            while start > 0 && line[start - 1] > ' ' && is_completable(line[start - 1]) {
                start -= 1;
                if is_quote(line[start]) {
                    stopped_at_quote = true;
                    break;
                }
            }
            scan.base = line[start..col].iter().collect();
            scan.char_before = if stopped_at_quote {
                Some(line[start])
            } else {
                start.checked_sub(1).map(|i| line[i])
            };
        }
    }
    scan
}

impl TextEdit {
    pub fn is_completion_active(&self) -> bool {
        self.completion.active
    }

    pub fn completion(&self) -> &CompletionSession {
        &self.completion
    }

    /// Ask the host for candidates if the caret sits somewhere completion makes sense.
    pub fn query_code_completion(&mut self) -> bool {
        if !self.options.completion_enabled {
            return false;
        }
        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let col = self.cursor.column.min(line.len());
        let in_quote = line[..col]
            .iter()
            .filter(|&&c| c == '"' || c == '\'')
            .count()
            % 2
            == 1;

        let Some(&before) = col.checked_sub(1).and_then(|i| line.get(i)) else {
            return false;
        };
        if in_quote || is_completable(before) || self.options.is_completion_prefix(before) {
            self.notifier.push(EditorEvent::RequestCompletion);
            return true;
        }
        false
    }

    /// Open the popup with host-supplied candidates.
    pub fn code_complete(&mut self, candidates: Vec<String>) {
        self.completion.candidates = candidates;
        self.completion.active = true;
        self.completion.index = 0;
        self.update_completion_candidates();
    }

    /// Re-extract the prefix and re-rank. Cancels when nothing is left to offer.
    pub fn update_completion_candidates(&mut self) {
        let line: Vec<char> = self.text.line(self.cursor.line).chars().collect();
        let col = self.cursor.column.min(line.len());
        let scan = scan_prefix(&line, col, &self.options.completion_keywords);
        self.notifier.redraw();

        let after_paren = col > 0
            && line[col - 1] == '('
            && !scan.pre_keyword
            && !self
                .completion
                .candidates
                .first()
                .is_some_and(|c| c.starts_with('"'));
        let triggered = scan
            .char_before
            .is_some_and(|c| self.options.is_completion_prefix(c));

        if scan.cancel || after_paren || (!scan.pre_keyword && scan.base.is_empty() && !triggered)
        {
            self.cancel_code_completion();
            return;
        }

        let ranked = rank_candidates(&scan.base, &self.completion.candidates);
        match ranked {
            Some(options) if !options.is_empty() => {
                tracing::trace!(base = %scan.base, options = options.len(), "completion ranked");
                self.completion.options = options.into_iter().map(|o| o.text).collect();
                self.completion.index = 0;
                self.completion.base = scan.base;
            }
            _ => self.cancel_code_completion(),
        }
    }

    /// Replace the typed prefix with the selected option as one undo step.
    pub fn confirm_completion(&mut self) {
        let Some(current) = self.completion.current().map(str::to_string) else {
            self.cancel_code_completion();
            return;
        };
        let base_len = self.completion.base.chars().count().min(self.cursor.column);
        let line = self.cursor.line;
        let start = self.cursor.column - base_len;

        self.begin_complex_operation();
        self.apply_remove((line, start).into(), (line, self.cursor.column).into());
        self.cursor_set_column(start, false);
        self.insert_text_at_cursor(&current);
        if current.ends_with('(') && self.options.auto_brace_completion {
            self.insert_text_at_cursor(")");
            self.cursor_set_column(self.cursor.column.saturating_sub(1), true);
        }
        self.end_complex_operation();

        self.cancel_code_completion();
    }

    pub fn cancel_code_completion(&mut self) {
        if !self.completion.active {
            return;
        }
        self.completion.active = false;
        self.notifier.redraw();
    }

    pub fn completion_select_previous(&mut self) {
        self.completion.select_previous();
        self.notifier.redraw();
    }

    pub fn completion_select_next(&mut self) {
        self.completion.select_next();
        self.notifier.redraw();
    }

    pub fn completion_page_up(&mut self) {
        self.completion.page_up(self.options.completion_lines);
        self.notifier.redraw();
    }

    pub fn completion_page_down(&mut self) {
        self.completion.page_down(self.options.completion_lines);
        self.notifier.redraw();
    }

    pub fn completion_select_first(&mut self) {
        self.completion.select_first();
        self.notifier.redraw();
    }

    pub fn completion_select_last(&mut self) {
        self.completion.select_last();
        self.notifier.redraw();
    }

    pub fn set_code_hint(&mut self, hint: &str) {
        self.completion.hint = hint.to_string();
        self.notifier.redraw();
    }

    pub fn cancel_code_hint(&mut self) {
        if !self.completion.hint.is_empty() {
            self.completion.hint.clear();
            self.notifier.redraw();
        }
    }

    pub fn code_hint(&self) -> &str {
        &self.completion.hint
    }
}
