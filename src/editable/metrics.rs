//! Font metrics service and pixel/column conversion.
//!
//! The engine never draws, but horizontal caret placement and line widths are
//! measured in pixels. The host injects a [`FontMetrics`] implementation; two are
//! provided: [`MonospaceMetrics`] for fixed cells and [`FontdueMetrics`] backed by a
//! real font file.

use fontdue::{Font, FontSettings};
use thiserror::Error;

/// Character metrics consumed by the engine.
pub trait FontMetrics: Send + Sync {
    /// Advance width of `ch` in pixels when followed by `next` (kerning included).
    fn char_width(&self, ch: char, next: Option<char>) -> usize;

    /// Height of one text row in pixels, without extra line spacing.
    fn line_height(&self) -> usize;
}

/// Fixed-cell metrics. Every character has the same advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    pub cell_width: usize,
    pub line_height: usize,
}

impl MonospaceMetrics {
    pub const fn new(cell_width: usize, line_height: usize) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(10, 20)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn char_width(&self, _ch: char, _next: Option<char>) -> usize {
        self.cell_width
    }

    fn line_height(&self) -> usize {
        self.line_height
    }
}

#[derive(Debug, Error)]
#[error("failed to load font: {0}")]
pub struct FontLoadError(&'static str);

/// Metrics read from a TrueType/OpenType font rasterized at a fixed pixel size.
pub struct FontdueMetrics {
    font: Font,
    px: f32,
}

impl FontdueMetrics {
    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, FontLoadError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(FontLoadError)?;
        Ok(Self { font, px })
    }
}

impl FontMetrics for FontdueMetrics {
    fn char_width(&self, ch: char, next: Option<char>) -> usize {
        let advance = self.font.metrics(ch, self.px).advance_width;
        let kern = next
            .and_then(|n| self.font.horizontal_kern(ch, n, self.px))
            .unwrap_or(0.0);
        (advance + kern).round().max(0.0) as usize
    }

    fn line_height(&self) -> usize {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|m| m.new_line_size)
            .unwrap_or(self.px)
            .ceil() as usize
    }
}

/// Pixel measurement of a single line of text.
///
/// Tabs advance to the next multiple of `space width * tab_size` rather than by a
/// fixed amount, so a tab after a short word is narrower than one after nothing.
#[derive(Clone, Copy)]
pub struct Measure<'a> {
    metrics: &'a dyn FontMetrics,
    tab_width: usize,
}

impl<'a> Measure<'a> {
    pub fn new(metrics: &'a dyn FontMetrics, tab_size: usize) -> Self {
        let tab_width = (metrics.char_width(' ', None) * tab_size).max(1);
        Self { metrics, tab_width }
    }

    fn advance(&self, x: usize, ch: char, next: Option<char>) -> usize {
        if ch == '\t' {
            self.tab_width - x % self.tab_width
        } else {
            self.metrics.char_width(ch, next)
        }
    }

    /// Total pixel width of `text`.
    pub fn width(&self, text: &str) -> usize {
        self.x_offset(text, usize::MAX)
    }

    /// Pixel x coordinate of the left edge of column `col`.
    pub fn x_offset(&self, text: &str, col: usize) -> usize {
        let mut x = 0;
        let mut chars = text.chars().peekable();
        for _ in 0..col {
            let Some(ch) = chars.next() else { break };
            x += self.advance(x, ch, chars.peek().copied());
        }
        x
    }

    /// Column whose glyph midpoint has not been passed by pixel position `px`.
    pub fn column_at(&self, text: &str, px: usize) -> usize {
        let mut x = 0;
        let mut col = 0;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let w = self.advance(x, ch, chars.peek().copied());
            if px < x + w / 2 {
                break;
            }
            x += w;
            col += 1;
        }
        col
    }
}
