//! Font measurement providers behind the [`TextMeasurer`] seam.
//!
//! Two production implementations exist: a Parley-backed shaper over real
//! font bytes, and a fixed-metric fallback substituted when the requested
//! font file cannot be loaded. The fallback ignores the requested size, so
//! the fitter's size search degrades to a walk to the floor, as intended.

use std::path::Path;

use crate::error::{OffgenError, OffgenResult};
use crate::text_fit::TextMeasurer;

/// RGBA8 brush color carried through Parley layouts into glyph runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl GlyphBrush {
    /// Opaque black, the default ink for generated artifacts.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Build a brush from a straight-alpha RGBA8 quadruple.
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

/// Parley-backed measurer that shapes lines with real font metrics.
pub struct ShapedMeasurer {
    font_bytes: Vec<u8>,
    family_name: String,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

impl ShapedMeasurer {
    /// Register `font_bytes` with a fresh Parley context.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> OffgenResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            OffgenError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| OffgenError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_bytes,
            family_name,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// Shape and lay out a single line at `size_px` without line breaking.
    pub(crate) fn layout_line(
        &mut self,
        line: &str,
        size_px: f32,
        brush: GlyphBrush,
    ) -> parley::Layout<GlyphBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(line);
        layout.break_all_lines(None);
        layout
    }

    /// Font data handle for glyph rasterization.
    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.font_bytes.clone()),
            0,
        )
    }
}

impl TextMeasurer for ShapedMeasurer {
    fn measure(&mut self, line: &str, size_px: u32) -> (f64, f64) {
        let layout = self.layout_line(line, size_px as f32, GlyphBrush::default());
        (f64::from(layout.width()), f64::from(layout.height()))
    }
}

/// Fixed-metric fallback used when the requested font cannot be loaded.
///
/// Every character occupies the same cell regardless of the requested size.
#[derive(Clone, Copy, Debug)]
pub struct FixedMeasurer {
    /// Width of every character cell in pixels.
    pub char_width: f64,
    /// Height of every line in pixels.
    pub line_height: f64,
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self {
            char_width: 6.0,
            line_height: 11.0,
        }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&mut self, line: &str, _size_px: u32) -> (f64, f64) {
        let chars = line.chars().count();
        (chars as f64 * self.char_width, self.line_height)
    }
}

/// Measurer selected by try/fallback at font load time.
pub enum FontMeasurer {
    /// Real font metrics from loaded font bytes.
    Shaped(ShapedMeasurer),
    /// Fixed-metric fallback; the font file was unavailable.
    Fixed(FixedMeasurer),
}

impl FontMeasurer {
    /// Load the font at `path`, substituting the fixed-metric fallback on any
    /// read or registration failure. Never fails.
    pub fn load_or_fallback(path: &Path) -> Self {
        match std::fs::read(path).map_err(anyhow::Error::from).and_then(|bytes| {
            ShapedMeasurer::from_font_bytes(bytes).map_err(anyhow::Error::from)
        }) {
            Ok(shaped) => Self::Shaped(shaped),
            Err(err) => {
                tracing::warn!(
                    font = %path.display(),
                    %err,
                    "font unavailable, using fixed-metric fallback"
                );
                Self::Fixed(FixedMeasurer::default())
            }
        }
    }

    /// Whether real shaped metrics are available.
    pub fn is_shaped(&self) -> bool {
        matches!(self, Self::Shaped(_))
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&mut self, line: &str, size_px: u32) -> (f64, f64) {
        match self {
            Self::Shaped(m) => m.measure(line, size_px),
            Self::Fixed(m) => m.measure(line, size_px),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_measurer_ignores_size() {
        let mut m = FixedMeasurer::default();
        assert_eq!(m.measure("abcd", 100), m.measure("abcd", 10));
        assert_eq!(m.measure("abcd", 100), (24.0, 11.0));
    }

    #[test]
    fn fixed_measurer_empty_line_has_zero_width() {
        let mut m = FixedMeasurer::default();
        let (w, h) = m.measure("", 50);
        assert_eq!(w, 0.0);
        assert!(h > 0.0);
    }

    #[test]
    fn missing_font_path_falls_back() {
        let m = FontMeasurer::load_or_fallback(Path::new("definitely/not/here.ttf"));
        assert!(!m.is_shaped());
    }
}
