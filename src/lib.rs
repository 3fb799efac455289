//! offgen: offline generation of shareable artifacts from short text.
//!
//! One input string becomes one of five outputs: a text-card PNG, a bar-chart
//! PNG, a DOCX, a PDF, or a narrated MP4 slideshow. Everything runs locally;
//! video and narration shell out to `ffmpeg` and `espeak-ng`.
#![forbid(unsafe_code)]

pub mod afm;
pub mod card;
pub mod chart;
pub mod docx;
pub mod error;
pub mod fonts;
pub mod output;
pub mod pdf;
pub mod raster;
pub mod speech;
pub mod text_fit;
pub mod video;

pub use card::{TextCardOpts, render_text_card, write_text_card};
pub use chart::{BarChart, parse_labels, parse_values, render_chart, write_chart};
pub use docx::{build_docx, write_docx};
pub use error::{OffgenError, OffgenResult};
pub use fonts::FontMeasurer;
pub use output::OutputDir;
pub use pdf::{build_pdf, write_pdf};
pub use raster::FrameRgba;
pub use speech::{SpeechOpts, probe_audio_duration, synthesize_speech};
pub use text_fit::{Canvas, FitOutcome, LineLayout, LinePlacement, TextMeasurer, fit};
pub use video::{EncodeOpts, FfmpegEncoder, SlideshowOpts, render_slideshow};
