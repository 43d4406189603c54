//! Line buffer with a per-line width and region cache.
//!
//! The document is an ordered list of [`Line`]s. Each line lazily caches its pixel
//! width and the columns at which configured region delimiters (comment and string
//! markers) open or close. Changing a line's text drops its cache; nothing is
//! recomputed until somebody asks.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::metrics::{FontMetrics, Measure, MonospaceMetrics};
use crate::util::text::{char_len, is_symbol};

/// Read-only view of line-oriented text, shared by search and completion.
pub trait TextBuffer {
    /// Number of lines (always >= 1 for a [`LineBuffer`])
    fn line_count(&self) -> usize;

    /// Line content without the newline. Panics if `line` is out of range.
    fn line(&self, line: usize) -> &str;

    /// Length of a specific line in characters
    fn line_length(&self, line: usize) -> usize {
        char_len(self.line(line))
    }

    /// Get character at position, None if out of bounds
    fn char_at(&self, line: usize, column: usize) -> Option<char> {
        if line >= self.line_count() {
            return None;
        }
        self.line(line).chars().nth(column)
    }

    /// Full content, lines joined by `\n`
    fn content(&self) -> String {
        (0..self.line_count())
            .map(|i| self.line(i))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextBuffer for [String] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, line: usize) -> &str {
        &self[line]
    }
}

impl TextBuffer for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, line: usize) -> &str {
        &self[line]
    }
}

/// A begin/end delimiter pair such as `/*` `*/` or `"` `"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRegion {
    pub begin_key: String,
    pub end_key: String,
    /// Region always ends at the end of its line (e.g. `#` comments).
    pub line_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("region begin key is empty")]
    EmptyBeginKey,
    #[error("region begin key {0:?} must start with a symbol character")]
    BeginKeyNotSymbol(String),
    #[error("region {0:?} needs an end key unless it is line-only")]
    MissingEndKey(String),
}

impl ColorRegion {
    /// Build a region, rejecting delimiter tables the scanner could never match.
    pub fn new(
        begin_key: impl Into<String>,
        end_key: impl Into<String>,
        line_only: bool,
    ) -> Result<Self, RegionError> {
        let region = Self {
            begin_key: begin_key.into(),
            end_key: end_key.into(),
            line_only,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<(), RegionError> {
        let Some(first) = self.begin_key.chars().next() else {
            return Err(RegionError::EmptyBeginKey);
        };
        if !is_symbol(first) {
            return Err(RegionError::BeginKeyNotSymbol(self.begin_key.clone()));
        }
        if self.end_key.is_empty() && !self.line_only {
            return Err(RegionError::MissingEndKey(self.begin_key.clone()));
        }
        Ok(())
    }

    /// Same key opens and closes (string quotes).
    pub fn is_symmetric(&self) -> bool {
        self.begin_key == self.end_key
    }
}

/// A region delimiter found at some column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInfo {
    /// Index into the region table
    pub region: usize,
    /// True if this is the end key
    pub end: bool,
}

/// A resolved region run within one line, columns `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpan {
    pub region: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default)]
struct LineCache {
    width: usize,
    regions: BTreeMap<usize, RegionInfo>,
}

/// One row of text.
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
    cache: OnceCell<LineCache>,
    marked: bool,
    breakpoint: bool,
}

impl Line {
    fn new(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn is_breakpoint(&self) -> bool {
        self.breakpoint
    }

    /// Whether width and regions are currently cached.
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.cache = OnceCell::new();
    }
}

/// The document: never fewer than one line.
#[derive(Clone)]
pub struct LineBuffer {
    lines: Vec<Line>,
    tab_size: usize,
    regions: Arc<[ColorRegion]>,
    metrics: Arc<dyn FontMetrics>,
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("lines", &self.lines.len())
            .field("tab_size", &self.tab_size)
            .field("regions", &self.regions)
            .finish()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(Arc::new(MonospaceMetrics::default()), 4)
    }
}

impl LineBuffer {
    pub fn new(metrics: Arc<dyn FontMetrics>, tab_size: usize) -> Self {
        Self {
            lines: vec![Line::default()],
            tab_size,
            regions: Arc::from(Vec::new()),
            metrics,
        }
    }

    /// Buffer holding `text` split on `\n` (carriage returns dropped).
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.lines = text
            .split('\n')
            .map(|l| Line::new(l.replace('\r', "")))
            .collect();
        buffer
    }

    // =========================================================================
    // Line access and structural edits
    // =========================================================================

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false: the buffer keeps at least one line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, i: usize) -> &Line {
        &self.lines[i]
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Replace line `i`'s text and drop its cache.
    pub fn set(&mut self, i: usize, text: impl Into<String>) {
        self.lines[i].set_text(text.into());
    }

    /// Insert a new line before index `i` (`i == len()` appends).
    pub fn insert(&mut self, i: usize, text: impl Into<String>) {
        self.lines.insert(i, Line::new(text.into()));
    }

    /// Insert several lines starting at index `at`.
    pub(crate) fn insert_many(&mut self, at: usize, texts: impl IntoIterator<Item = String>) {
        self.lines.splice(at..at, texts.into_iter().map(Line::new));
    }

    /// Remove line `i`. Removing the only line empties it instead.
    pub fn remove(&mut self, i: usize) {
        if self.lines.len() == 1 {
            assert_eq!(i, 0, "line index {i} out of range");
            self.lines[0] = Line::default();
        } else {
            self.lines.remove(i);
        }
    }

    /// Remove lines in `start..end`, keeping at least one line.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        self.lines.drain(start..end);
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
    }

    /// Reset to a single empty line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(Line::default());
    }

    /// Characters in the document, counting one per line break.
    pub fn char_count(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| char_len(&l.text)).sum();
        chars + self.lines.len() - 1
    }

    // =========================================================================
    // Markers
    // =========================================================================

    pub fn set_marked(&mut self, i: usize, marked: bool) {
        self.lines[i].marked = marked;
    }

    pub fn is_marked(&self, i: usize) -> bool {
        self.lines[i].marked
    }

    pub fn set_breakpoint(&mut self, i: usize, breakpoint: bool) {
        self.lines[i].breakpoint = breakpoint;
    }

    pub fn is_breakpoint(&self, i: usize) -> bool {
        self.lines[i].breakpoint
    }

    /// Rows carrying a breakpoint, ascending.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.breakpoint)
            .map(|(i, _)| i)
            .collect()
    }

    // =========================================================================
    // Measurement configuration
    // =========================================================================

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        if self.tab_size != tab_size {
            self.tab_size = tab_size;
            self.clear_caches();
        }
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    pub fn set_metrics(&mut self, metrics: Arc<dyn FontMetrics>) {
        self.metrics = metrics;
        self.clear_caches();
    }

    pub fn regions(&self) -> &[ColorRegion] {
        &self.regions
    }

    pub fn set_regions(&mut self, regions: Vec<ColorRegion>) {
        self.regions = Arc::from(regions);
        self.clear_caches();
    }

    pub fn add_region(&mut self, region: ColorRegion) {
        let mut regions = self.regions.to_vec();
        regions.push(region);
        self.set_regions(regions);
    }

    pub fn measure(&self) -> Measure<'_> {
        Measure::new(self.metrics.as_ref(), self.tab_size)
    }

    /// Drop every line's cache (after a font, tab size or region change).
    pub fn clear_caches(&mut self) {
        for line in &mut self.lines {
            line.cache = OnceCell::new();
        }
    }

    // =========================================================================
    // Cached queries
    // =========================================================================

    fn cache(&self, i: usize) -> &LineCache {
        let line = &self.lines[i];
        line.cache.get_or_init(|| {
            tracing::trace!(line = i, "recomputing line cache");
            LineCache {
                width: self.measure().width(&line.text),
                regions: scan_regions(&line.text, &self.regions),
            }
        })
    }

    /// Pixel width of line `i`.
    pub fn get_line_width(&self, i: usize) -> usize {
        self.cache(i).width
    }

    /// Region delimiters found on line `i`, keyed by column.
    pub fn get_region_info(&self, i: usize) -> &BTreeMap<usize, RegionInfo> {
        &self.cache(i).regions
    }

    /// Widest line in pixels.
    pub fn get_max_width(&self) -> usize {
        (0..self.lines.len())
            .map(|i| self.get_line_width(i))
            .max()
            .unwrap_or(0)
    }

    /// Resolve region runs on line `i` given the region still open from the line
    /// above. Returns the runs and the region left open for the next line.
    pub fn region_spans(&self, i: usize, incoming: Option<usize>) -> (Vec<RegionSpan>, Option<usize>) {
        let mut spans = Vec::new();
        let mut open = incoming.map(|region| (region, 0));

        for (&col, info) in self.get_region_info(i) {
            let region = &self.regions[info.region];
            match open {
                None if !info.end => open = Some((info.region, col)),
                Some((current, start))
                    if current == info.region
                        && !region.line_only
                        && (info.end || region.is_symmetric()) =>
                {
                    let key_len = char_len(if info.end {
                        &region.end_key
                    } else {
                        &region.begin_key
                    });
                    spans.push(RegionSpan {
                        region: current,
                        start,
                        end: col + key_len,
                    });
                    open = None;
                }
                _ => {}
            }
        }

        let leaving = open.and_then(|(region, start)| {
            spans.push(RegionSpan {
                region,
                start,
                end: self.line_length(i),
            });
            (!self.regions[region].line_only).then_some(region)
        });
        (spans, leaving)
    }
}

impl TextBuffer for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> &str {
        &self.lines[line].text
    }
}

/// Find every region delimiter on one line. Only symbol characters can start a
/// key, and a backslash escapes the character after it.
fn scan_regions(text: &str, regions: &[ColorRegion]) -> BTreeMap<usize, RegionInfo> {
    let mut found = BTreeMap::new();
    if regions.is_empty() {
        return found;
    }

    let chars: Vec<char> = text.chars().collect();
    let matches_at = |at: usize, key: &str| {
        let mut n = 0;
        for k in key.chars() {
            if chars.get(at + n) != Some(&k) {
                return None;
            }
            n += 1;
        }
        (n > 0).then_some(n)
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !is_symbol(c) {
            i += 1;
            continue;
        }
        if c == '\\' {
            i += 2;
            continue;
        }

        for (j, region) in regions.iter().enumerate() {
            if let Some(len) = matches_at(i, &region.begin_key) {
                found.insert(i, RegionInfo { region: j, end: false });
                i += len - 1;
                break;
            }
            if let Some(len) = matches_at(i, &region.end_key) {
                found.insert(i, RegionInfo { region: j, end: true });
                i += len - 1;
                break;
            }
        }
        i += 1;
    }
    found
}
