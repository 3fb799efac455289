//! Canvas text fitter: pick a font size and line wrapping so a text block
//! fits a margined canvas, then emit centered per-line draw positions.
//!
//! The fitter is pure: measurement is injected through [`TextMeasurer`], no
//! I/O happens here, and it never fails. When even the minimum font size
//! overflows the canvas the best-effort layout is still returned, tagged
//! [`FitOutcome::Overflowed`].

use crate::error::{OffgenError, OffgenResult};

/// Font size the search starts from, in pixels.
pub const START_FONT_SIZE: u32 = 100;
/// Font size floor; below this the search gives up and returns best-effort.
pub const MIN_FONT_SIZE: u32 = 10;

/// Character count used for the coarse first-pass wrap that drives the size
/// search. Chosen independently of glyph metrics; the refinement pass corrects
/// it once the size is fixed.
const COARSE_WRAP_CHARS: usize = 40;

/// Fixed-size drawable canvas with a uniform margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Total width in pixels.
    pub width: u32,
    /// Total height in pixels.
    pub height: u32,
    /// Uniform margin in pixels, excluded from the drawable rect on all sides.
    pub margin: u32,
}

impl Canvas {
    /// Create a validated canvas. The margin must leave a non-empty inner rect
    /// (margin strictly less than half of each dimension).
    pub fn new(width: u32, height: u32, margin: u32) -> OffgenResult<Self> {
        if width == 0 || height == 0 {
            return Err(OffgenError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        let doubled = margin.checked_mul(2);
        if doubled.is_none_or(|m| m >= width || m >= height) {
            return Err(OffgenError::validation(format!(
                "canvas margin {margin} must be less than half of {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            margin,
        })
    }

    /// Width of the inner drawable rect.
    pub fn inner_width(self) -> f64 {
        f64::from(self.width - 2 * self.margin)
    }

    /// Height of the inner drawable rect.
    pub fn inner_height(self) -> f64 {
        f64::from(self.height - 2 * self.margin)
    }
}

/// Measurement capability consumed by [`fit`].
///
/// Implementations return the rendered bounding box of a single line at the
/// requested pixel size. A fixed-metric fallback implementation may ignore
/// `size_px` entirely; the search then degrades to a no-op walk to the floor,
/// which is the intended behavior.
pub trait TextMeasurer {
    /// Measure one line of text, returning `(width, height)` in pixels.
    fn measure(&mut self, line: &str, size_px: u32) -> (f64, f64);
}

/// One placed line of the final layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePlacement {
    /// Line text after wrapping.
    pub text: String,
    /// Left edge of the line, centering it horizontally on the canvas.
    pub x: f64,
    /// Top edge of the line.
    pub y: f64,
    /// Measured line width.
    pub width: f64,
    /// Measured line height.
    pub height: f64,
}

/// Whether the returned layout satisfies the fit constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitOutcome {
    /// Every line fits the inner width and the stacked block fits the inner
    /// height.
    Fitted,
    /// The font floor was reached without satisfying the constraint; the
    /// layout is best-effort and overflows the inner rect.
    Overflowed,
}

/// Ordered line placements produced by [`fit`], consumed once by a renderer.
#[derive(Clone, Debug)]
pub struct LineLayout {
    /// Font size the search settled on.
    pub font_size_px: u32,
    /// Fit vs best-effort overflow.
    pub outcome: FitOutcome,
    /// Placed lines in top-to-bottom order.
    pub lines: Vec<LinePlacement>,
}

impl LineLayout {
    /// Sum of the measured heights of all lines.
    pub fn total_height(&self) -> f64 {
        self.lines.iter().map(|l| l.height).sum()
    }
}

/// Wrap `text` at `max_chars` characters per line.
///
/// Explicit newlines split the text into paragraphs that are wrapped
/// independently and stacked in order. Wrapping breaks on whitespace and
/// never splits a word; a single word longer than `max_chars` lands on its
/// own (overflowing) line. Empty input yields a single empty line.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let opts = textwrap::Options::new(max_chars.max(1)).break_words(false);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let wrapped = textwrap::wrap(paragraph, &opts);
        if wrapped.is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrapped.into_iter().map(|l| l.into_owned()));
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Fit `text` onto `canvas`, returning centered per-line placements.
///
/// The search decrements an integer font size from [`START_FONT_SIZE`] to
/// [`MIN_FONT_SIZE`], measuring a coarse 40-character wrap at each candidate,
/// and stops at the first size where the widest line fits the inner width and
/// the stacked heights fit the inner height. A refinement pass then derives a
/// characters-per-line budget from the coarse measurements and re-wraps.
pub fn fit(text: &str, canvas: Canvas, measurer: &mut dyn TextMeasurer) -> LineLayout {
    let inner_w = canvas.inner_width();
    let inner_h = canvas.inner_height();

    // The coarse wrap is size-independent, so compute it once up front.
    let coarse = wrap_lines(text, COARSE_WRAP_CHARS);

    let mut size = START_FONT_SIZE;
    let mut coarse_widest_w: f64;
    loop {
        let mut total_h = 0.0f64;
        coarse_widest_w = 0.0;
        for line in &coarse {
            let (w, h) = measurer.measure(line, size);
            coarse_widest_w = coarse_widest_w.max(w);
            total_h += h;
        }
        if (coarse_widest_w <= inner_w && total_h <= inner_h) || size <= MIN_FONT_SIZE {
            break;
        }
        size -= 1;
    }

    // Derive a per-character width from the coarse pass: widest measured width
    // over the longest line's character count. The divisor is the maximum, not
    // a true average; downstream wrapping depends on exactly this statistic.
    let widest_len = coarse
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let avg_char_width = coarse_widest_w.max(1.0) / widest_len as f64;
    let max_chars = ((inner_w / avg_char_width).floor() as usize).max(1);

    let refined = wrap_lines(text, max_chars);
    let measured: Vec<(String, f64, f64)> = refined
        .into_iter()
        .map(|line| {
            let (w, h) = measurer.measure(&line, size);
            (line, w, h)
        })
        .collect();

    let total_h: f64 = measured.iter().map(|&(_, _, h)| h).sum();
    let mut widest_w = 0.0f64;
    // Vertical centering is not clamped: a still-overflowing block starts
    // above the canvas rather than being truncated.
    let mut y = (f64::from(canvas.height) - total_h) / 2.0;

    let mut lines = Vec::with_capacity(measured.len());
    for (line, w, h) in measured {
        widest_w = widest_w.max(w);
        let x = (f64::from(canvas.width) - w) / 2.0;
        lines.push(LinePlacement {
            text: line,
            x,
            y,
            width: w,
            height: h,
        });
        y += h;
    }

    let outcome = if widest_w <= inner_w && total_h <= inner_h {
        FitOutcome::Fitted
    } else {
        FitOutcome::Overflowed
    };

    tracing::debug!(
        font_size_px = size,
        lines = lines.len(),
        ?outcome,
        "text fit complete"
    );

    LineLayout {
        font_size_px: size,
        outcome,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_degenerate_margins() {
        assert!(Canvas::new(0, 100, 0).is_err());
        assert!(Canvas::new(100, 100, 50).is_err());
        assert!(Canvas::new(100, 100, 60).is_err());
        assert!(Canvas::new(100, 100, 49).is_ok());
    }

    #[test]
    fn canvas_rejects_margins_whose_double_overflows() {
        // 2 * margin wraps past u32::MAX; must not slip through validation.
        assert!(Canvas::new(100, 100, u32::MAX / 2 + 1).is_err());
        assert!(Canvas::new(100, 100, u32::MAX).is_err());
    }

    #[test]
    fn inner_rect_subtracts_margin_on_both_sides() {
        let c = Canvas::new(512, 512, 20).unwrap();
        assert_eq!(c.inner_width(), 472.0);
        assert_eq!(c.inner_height(), 472.0);
    }

    #[test]
    fn wrap_breaks_on_whitespace_only() {
        let lines = wrap_lines("alpha beta gamma", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn wrap_keeps_overlong_words_whole() {
        let lines = wrap_lines("a verylongunbreakableword b", 10);
        assert!(lines.contains(&"verylongunbreakableword".to_string()));
    }

    #[test]
    fn wrap_empty_input_is_one_empty_line() {
        assert_eq!(wrap_lines("", 40), vec![String::new()]);
    }

    #[test]
    fn wrap_newlines_become_paragraph_breaks() {
        let lines = wrap_lines("first\nsecond slide", 40);
        assert_eq!(lines, vec!["first", "second slide"]);
    }
}
