//! Text measurement.
//!
//! Lines are wrapped the way a multi-line text control soft-wraps:
//! - explicit `\n` always starts a new line
//! - breaks happen at word boundaries (UAX #29)
//! - words wider than the line fall back to grapheme breaks
//! - whitespace that overflows a line is absorbed by the break

use crate::widget::TextStyle;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Font measurement supplied by the host.
pub trait TextMetrics: Send + Sync {
    /// Height of one line of text.
    fn line_height(&self, style: &TextStyle) -> f32;

    /// Advance width of a run of text on a single line.
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;
}

/// Fixed-advance metrics: every character cell is `advance * font size` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Cell advance as a fraction of the font size
    pub advance: f32,
}

impl MonospaceMetrics {
    /// Create metrics with the given advance ratio.
    #[must_use]
    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn line_height(&self, style: &TextStyle) -> f32 {
        style.size * style.line_height
    }

    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        text.width() as f32 * self.advance * style.size
    }
}

/// Metrics of a host that performs no layout: everything measures zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullMetrics;

impl TextMetrics for NullMetrics {
    fn line_height(&self, _style: &TextStyle) -> f32 {
        0.0
    }

    fn text_width(&self, _text: &str, _style: &TextStyle) -> f32 {
        0.0
    }
}

/// Count visual lines of `text` wrapped at `max_width`.
///
/// Empty text still occupies one line. A non-positive or non-finite width
/// disables soft wrapping.
pub fn count_lines(
    text: &str,
    max_width: f32,
    metrics: &dyn TextMetrics,
    style: &TextStyle,
) -> usize {
    let wrap = max_width.is_finite() && max_width > 0.0;
    text.split('\n')
        .map(|line| {
            if wrap {
                count_wrapped(line, max_width, metrics, style)
            } else {
                1
            }
        })
        .sum()
}

fn count_wrapped(line: &str, max_width: f32, metrics: &dyn TextMetrics, style: &TextStyle) -> usize {
    let mut lines = 1;
    let mut current = 0.0_f32;

    for segment in line.split_word_bounds() {
        let width = metrics.text_width(segment, style);

        if current + width <= max_width {
            current += width;
            continue;
        }

        if segment.chars().all(char::is_whitespace) {
            // Overflowing whitespace hangs at the end of the line.
            continue;
        }

        if current > 0.0 {
            lines += 1;
            current = 0.0;
        }

        if width <= max_width {
            current = width;
            continue;
        }

        for grapheme in segment.graphemes(true) {
            let gw = metrics.text_width(grapheme, style);
            if current + gw > max_width && current > 0.0 {
                lines += 1;
                current = 0.0;
            }
            current += gw;
        }
    }

    lines
}
