//! Text-card generation: render a block of text centered on a solid canvas
//! and encode it as a PNG.

use std::path::PathBuf;

use crate::error::OffgenResult;
use crate::fonts::FontMeasurer;
use crate::output::OutputDir;
use crate::raster::{FrameRgba, Raster, save_png};
use crate::text_fit::{Canvas, fit};

/// Options for the text-card renderer.
#[derive(Clone, Debug)]
pub struct TextCardOpts {
    /// Canvas dimensions and margin.
    pub canvas: Canvas,
    /// Requested font file; the fixed-metric fallback is substituted when it
    /// cannot be loaded.
    pub font_path: PathBuf,
    /// Text ink color (straight RGBA8).
    pub text_rgba: [u8; 4],
    /// Background fill color (straight RGBA8).
    pub background_rgba: [u8; 4],
}

impl Default for TextCardOpts {
    fn default() -> Self {
        Self {
            // 512x512 with a 20px margin, white background, black text.
            canvas: Canvas {
                width: 512,
                height: 512,
                margin: 20,
            },
            font_path: PathBuf::from("arial.ttf"),
            text_rgba: [0, 0, 0, 255],
            background_rgba: [255, 255, 255, 255],
        }
    }
}

/// Render `text` onto an in-memory frame per the canvas text fitter.
pub fn render_text_card(text: &str, opts: &TextCardOpts) -> OffgenResult<FrameRgba> {
    let mut font = FontMeasurer::load_or_fallback(&opts.font_path);
    let layout = fit(text, opts.canvas, &mut font);

    let mut raster = Raster::new(
        opts.canvas.width,
        opts.canvas.height,
        opts.background_rgba,
    )?;
    raster.draw_layout(&mut font, &layout, opts.text_rgba);
    raster.finish()
}

/// Render `text` and write it as `image_*.png` under `out`.
pub fn write_text_card(text: &str, opts: &TextCardOpts, out: &OutputDir) -> OffgenResult<PathBuf> {
    let frame = render_text_card(text, opts)?;
    let path = out.unique_path("image", "png");
    save_png(&frame, &path)?;
    tracing::info!(path = %path.display(), "wrote text card");
    Ok(path)
}
