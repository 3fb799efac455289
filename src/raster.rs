//! CPU rasterization of fitted text and chart geometry onto RGBA frames.
//!
//! Vector/text drawing goes through `vello_cpu`; finished frames are
//! flattened from premultiplied alpha over the background color into opaque
//! straight RGBA8 suitable for PNG encoding and raw ffmpeg input.

use std::path::Path;

use crate::error::{OffgenError, OffgenResult};
use crate::fonts::{FontMeasurer, GlyphBrush};
use crate::text_fit::{LineLayout, TextMeasurer};

/// Opaque straight-alpha RGBA8 frame in row-major order.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

/// Accumulating draw surface backed by a `vello_cpu` render context.
pub struct Raster {
    width: u32,
    height: u32,
    background: [u8; 4],
    ctx: vello_cpu::RenderContext,
}

impl Raster {
    /// Create a surface cleared to `background` (straight RGBA8).
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> OffgenResult<Self> {
        if width == 0 || height == 0 {
            return Err(OffgenError::validation(
                "raster width/height must be non-zero",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(OffgenError::validation(format!(
                "raster {width}x{height} exceeds the supported surface size"
            )));
        }

        let mut ctx = vello_cpu::RenderContext::new(width as u16, height as u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            background[0],
            background[1],
            background[2],
            background[3],
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        Ok(Self {
            width,
            height,
            background,
            ctx,
        })
    }

    /// Fill an axis-aligned rectangle with a straight RGBA8 color.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgba: [u8; 4]) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + w, y + h));
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    ///
    /// Shaped fonts rasterize real glyph runs; the fixed-metric fallback draws
    /// one placeholder block per non-whitespace character so missing fonts
    /// still produce legible line structure.
    pub fn draw_text_line(
        &mut self,
        font: &mut FontMeasurer,
        text: &str,
        x: f64,
        y: f64,
        size_px: u32,
        rgba: [u8; 4],
    ) {
        match font {
            FontMeasurer::Shaped(shaped) => {
                let brush = GlyphBrush::from_rgba(rgba);
                let layout = shaped.layout_line(text, size_px as f32, brush);
                let font_data = shaped.font_data();

                self.ctx
                    .set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        self.ctx
                            .glyph_run(&font_data)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            }
            FontMeasurer::Fixed(fixed) => {
                let cell_w = fixed.char_width;
                let cell_h = fixed.line_height;
                for (i, ch) in text.chars().enumerate() {
                    if ch.is_whitespace() {
                        continue;
                    }
                    self.fill_rect(
                        x + i as f64 * cell_w,
                        y + 1.0,
                        cell_w - 1.0,
                        cell_h - 2.0,
                        rgba,
                    );
                }
            }
        }
    }

    /// Draw every placed line of a fitted layout.
    pub fn draw_layout(&mut self, font: &mut FontMeasurer, layout: &LineLayout, rgba: [u8; 4]) {
        for line in &layout.lines {
            self.draw_text_line(font, &line.text, line.x, line.y, layout.font_size_px, rgba);
        }
    }

    /// Draw one line of text horizontally centered on `center_x`.
    pub fn draw_text_centered(
        &mut self,
        font: &mut FontMeasurer,
        text: &str,
        center_x: f64,
        y: f64,
        size_px: u32,
        rgba: [u8; 4],
    ) {
        let (w, _) = font.measure(text, size_px);
        self.draw_text_line(font, text, center_x - w / 2.0, y, size_px, rgba);
    }

    /// Render all recorded drawing into an opaque RGBA8 frame.
    pub fn finish(mut self) -> OffgenResult<FrameRgba> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width as u16, self.height as u16);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let premul = pixmap.data_as_u8_slice();
        let mut data = vec![0u8; premul.len()];
        flatten_premul_over_bg_to_opaque_rgba8(&mut data, premul, self.background)?;

        Ok(FrameRgba {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Encode a frame as a PNG file, creating parent directories as needed.
pub fn save_png(frame: &FrameRgba, path: &Path) -> OffgenResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| OffgenError::generation(format!("failed to write png '{}': {e}", path.display())))
}

/// Flatten premultiplied RGBA8 over an opaque background color.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> OffgenResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(OffgenError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;
        let r = u16::from(s[0]) + mul_div255(bg_r, inv);
        let g = u16::from(s[1]) + mul_div255(bg_g, inv);
        let b = u16::from(s[2]) + mul_div255(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_alpha_0_returns_bg() {
        let src = vec![0u8, 0, 0, 0];
        let mut dst = vec![0u8; 4];
        flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
        assert_eq!(dst, vec![10, 20, 30, 255]);
    }

    #[test]
    fn flatten_alpha_255_is_identity() {
        let src = vec![1u8, 2, 3, 255];
        let mut dst = vec![0u8; 4];
        flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn flatten_rejects_mismatched_buffers() {
        let src = vec![0u8; 8];
        let mut dst = vec![0u8; 4];
        assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [0, 0, 0, 255]).is_err());
    }

    #[test]
    fn raster_rejects_zero_dimensions() {
        assert!(Raster::new(0, 10, [255; 4]).is_err());
        assert!(Raster::new(10, 0, [255; 4]).is_err());
    }
}
