//! # Text Measurement
//!
//! Width measurement, line wrapping and font-size fitting for plain text.
//!
//! Widths come from real glyph advances plus pair kerning through the
//! [`GlyphMetrics`] trait. Wrapping is greedy:
//!
//! - explicit newlines always break, and empty lines are kept
//! - Latin text breaks between words; a word wider than the box is split
//!   character by character
//! - CJK text breaks between any two characters, subject to kinsoku rules
//!   (see [`kinsoku`])
//! - whitespace never causes a break by itself and is not counted at the
//!   end of a line
//!
//! Widths passed in are inches, font sizes are points.

pub mod fit;
pub mod kinsoku;

use serde::Serialize;

use crate::font::GlyphMetrics;
use kinsoku::is_cjk;

pub const POINTS_PER_INCH: f64 = 72.0;

/// Tolerance for fit comparisons.
pub const FIT_EPSILON: f64 = 1e-6;

/// Height of `line_count` lines, in inches.
pub fn lines_height(line_count: usize, font_size: f64, line_spacing: f64) -> f64 {
    line_count as f64 * font_size * line_spacing / POINTS_PER_INCH
}

/// Result of measuring wrapped text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMeasure {
    /// Widest line, in inches.
    pub width: f64,
    /// Total block height, in inches.
    pub height: f64,
    pub line_count: usize,
    pub lines: Vec<String>,
}

/// The largest size that fits, with the measurement at that size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedText {
    pub font_size: f64,
    pub measure: TextMeasure,
}

pub struct TextMeasurer;

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self
    }

    /// Advance width of `text` in points, kerning included.
    pub fn measure_width(&self, metrics: &dyn GlyphMetrics, text: &str, font_size: f64) -> f64 {
        let upem = metrics.units_per_em();
        if upem <= 0.0 {
            return 0.0;
        }
        let mut units = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                units += metrics.kerning(p, ch);
            }
            units += metrics.advance(ch);
            prev = Some(ch);
        }
        units * font_size / upem
    }

    /// Wrap `text` into lines no wider than `max_width` inches.
    pub fn wrap(
        &self,
        metrics: &dyn GlyphMetrics,
        text: &str,
        font_size: f64,
        max_width: f64,
    ) -> Vec<String> {
        let max_width_pt = max_width * POINTS_PER_INCH;
        let normalized = text.replace("\r\n", "\n");
        let mut lines = Vec::new();
        for paragraph in normalized.split('\n') {
            if paragraph.is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut wrapper = LineWrapper {
                measurer: self,
                metrics,
                font_size,
                max_width_pt,
                lines: &mut lines,
                line: String::new(),
            };
            for token in tokenize(paragraph) {
                wrapper.push(token);
            }
            wrapper.finish();
        }
        lines
    }

    /// Wrap and measure `text`.
    pub fn measure(
        &self,
        metrics: &dyn GlyphMetrics,
        text: &str,
        font_size: f64,
        max_width: f64,
        line_spacing: f64,
    ) -> TextMeasure {
        let lines = self.wrap(metrics, text, font_size, max_width);
        let widest = lines
            .iter()
            .map(|l| self.measure_width(metrics, l, font_size))
            .fold(0.0, f64::max);
        TextMeasure {
            width: widest / POINTS_PER_INCH,
            height: lines_height(lines.len(), font_size, line_spacing),
            line_count: lines.len(),
            lines,
        }
    }

    /// Largest font size in `[min_pt, max_pt]` (half-point grid) at which
    /// `text` fits a `max_width` × `max_height` inch box, or `None` when it
    /// overflows even at `min_pt`.
    #[allow(clippy::too_many_arguments)]
    pub fn find_fitting_font_size(
        &self,
        metrics: &dyn GlyphMetrics,
        text: &str,
        max_width: f64,
        max_height: f64,
        min_pt: f64,
        max_pt: f64,
        line_spacing: f64,
    ) -> Option<FittedText> {
        let font_size = fit::largest_fitting_size(min_pt, max_pt, |size| {
            self.measure(metrics, text, size, max_width, line_spacing).height
                <= max_height + FIT_EPSILON
        })?;
        Some(FittedText {
            font_size,
            measure: self.measure(metrics, text, font_size, max_width, line_spacing),
        })
    }
}

/// A wrapping unit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Space(&'a str),
    Cjk(char),
    Word(&'a str),
}

/// Split a paragraph into whitespace runs, single CJK characters and
/// everything else grouped into words.
fn tokenize(paragraph: &str) -> Vec<Token<'_>> {
    fn flush<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str, run: &mut Option<(usize, bool)>, end: usize) {
        if let Some((start, space)) = run.take() {
            let s = &text[start..end];
            tokens.push(if space { Token::Space(s) } else { Token::Word(s) });
        }
    }

    let mut tokens = Vec::new();
    // (byte offset, is whitespace) of the run being accumulated
    let mut run: Option<(usize, bool)> = None;
    for (i, ch) in paragraph.char_indices() {
        let space = ch.is_whitespace();
        if !space && is_cjk(ch) {
            flush(&mut tokens, paragraph, &mut run, i);
            tokens.push(Token::Cjk(ch));
            continue;
        }
        match run {
            Some((_, was_space)) if was_space == space => {}
            _ => {
                flush(&mut tokens, paragraph, &mut run, i);
                run = Some((i, space));
            }
        }
    }
    flush(&mut tokens, paragraph, &mut run, paragraph.len());
    tokens
}

/// Greedy line filler for one paragraph.
struct LineWrapper<'a> {
    measurer: &'a TextMeasurer,
    metrics: &'a dyn GlyphMetrics,
    font_size: f64,
    max_width_pt: f64,
    lines: &'a mut Vec<String>,
    line: String,
}

impl LineWrapper<'_> {
    fn push(&mut self, token: Token<'_>) {
        match token {
            Token::Space(s) => self.line.push_str(s),
            Token::Cjk(ch) => {
                let mut buf = [0u8; 4];
                if !self.fits_with(ch.encode_utf8(&mut buf)) && self.has_content() {
                    // Whether or not a legal break exists, the character
                    // lands on whatever line is current.
                    self.break_before(ch);
                }
                self.line.push(ch);
            }
            Token::Word(word) => {
                if self.fits_with(word) {
                    self.line.push_str(word);
                    return;
                }
                if self.has_content() {
                    let first = word.chars().next().unwrap_or(' ');
                    if !self.break_before(first) {
                        self.line.push_str(word);
                        return;
                    }
                }
                if self.fits_with(word) {
                    self.line.push_str(word);
                } else {
                    self.hard_split(word);
                }
            }
        }
    }

    /// End the current line before `next`, honoring kinsoku. Returns false
    /// when no legal break exists.
    fn break_before(&mut self, next: char) -> bool {
        let visible_len = self.line.trim_end().len();
        let spaced = visible_len < self.line.len();
        let visible: Vec<char> = self.line[..visible_len].chars().collect();
        match kinsoku::break_point(&visible, next, spaced) {
            None => false,
            Some(split) => {
                let kept: String = visible[..split].iter().collect();
                self.lines.push(kept.trim_end().to_string());
                self.line = visible[split..].iter().collect();
                true
            }
        }
    }

    fn hard_split(&mut self, word: &str) {
        let mut buf = [0u8; 4];
        for ch in word.chars() {
            if !self.fits_with(ch.encode_utf8(&mut buf)) && self.has_content() {
                self.break_before(ch);
            }
            self.line.push(ch);
        }
    }

    fn fits_with(&self, text: &str) -> bool {
        let candidate = format!("{}{}", self.line, text);
        self.measurer
            .measure_width(self.metrics, candidate.trim_end(), self.font_size)
            <= self.max_width_pt + FIT_EPSILON
    }

    fn has_content(&self) -> bool {
        !self.line.trim().is_empty()
    }

    fn finish(self) {
        self.lines.push(self.line.trim_end().to_string());
    }
}
