//! MP4 slideshow encoding: one rendered text card per line of input, streamed
//! as raw frames into the system `ffmpeg`, with optional narration muxed in.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::card::{TextCardOpts, render_text_card};
use crate::error::{OffgenError, OffgenResult};
use crate::output::OutputDir;
use crate::raster::FrameRgba;
use crate::speech::{SpeechOpts, probe_audio_duration, synthesize_speech};

/// Options for one encoding session.
#[derive(Clone, Debug)]
pub struct EncodeOpts {
    /// Frame width in pixels. Must be even for yuv420p output.
    pub width: u32,
    /// Frame height in pixels. Must be even for yuv420p output.
    pub height: u32,
    /// Constant frame rate.
    pub fps: u32,
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Optional audio file muxed alongside the video track.
    pub audio: Option<PathBuf>,
}

impl EncodeOpts {
    fn validate(&self) -> OffgenResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OffgenError::validation("frame width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(OffgenError::validation(
                "frame width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(OffgenError::validation("fps must be non-zero"));
        }
        Ok(())
    }
}

/// Spawned `ffmpeg` process receiving raw RGBA frames on stdin.
pub struct FfmpegEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    width: u32,
    height: u32,
}

impl FfmpegEncoder {
    /// Spawn `ffmpeg` for this session.
    pub fn start(opts: &EncodeOpts) -> OffgenResult<Self> {
        opts.validate()?;
        ensure_parent_dir(&opts.out_path)?;
        if !opts.overwrite && opts.out_path.exists() {
            return Err(OffgenError::validation(format!(
                "output file '{}' already exists",
                opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(OffgenError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if opts.overwrite { "-y" } else { "-n" });

        // Input: raw opaque RGBA8 frames on stdin at a constant rate.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", opts.width, opts.height),
            "-r",
            &opts.fps.to_string(),
            "-i",
            "pipe:0",
        ]);

        if let Some(audio) = opts.audio.as_ref() {
            cmd.arg("-i").arg(audio).args([
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-shortest",
                "-movflags",
                "+faststart",
            ]);
        } else {
            cmd.args([
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ]);
        }
        cmd.arg(&opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            OffgenError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| OffgenError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| OffgenError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            width: opts.width,
            height: opts.height,
        })
    }

    /// Write one frame to the encoder.
    pub fn push_frame(&mut self, frame: &FrameRgba) -> OffgenResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(OffgenError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(OffgenError::encode("ffmpeg encoder is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            OffgenError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    /// Close stdin, wait for `ffmpeg`, and report any encoder error.
    pub fn finish(mut self) -> OffgenResult<()> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(|e| {
            OffgenError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| OffgenError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| OffgenError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(OffgenError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Options for the slideshow.
#[derive(Clone, Debug)]
pub struct SlideshowOpts {
    /// Per-slide card rendering options.
    pub card: TextCardOpts,
    /// Output frame rate.
    pub fps: u32,
    /// How long each slide stays on screen.
    pub seconds_per_slide: u32,
    /// Narration text, independent of the slide text. `None` or blank means a
    /// silent video.
    pub narration: Option<String>,
    /// Narration synthesis options, used when `narration` is set.
    pub speech: SpeechOpts,
}

impl Default for SlideshowOpts {
    fn default() -> Self {
        Self {
            card: TextCardOpts::default(),
            fps: 24,
            seconds_per_slide: 2,
            narration: None,
            speech: SpeechOpts::default(),
        }
    }
}

/// Narration text to synthesize, with blank input treated as "no narration".
fn effective_narration(narration: Option<&str>) -> Option<&str> {
    narration.map(str::trim).filter(|t| !t.is_empty())
}

/// Render `text` as an MP4 slideshow named `video_*.mp4` under `out`.
///
/// Each non-blank line becomes one slide. Narration text is independent of
/// the slide text and the video stays silent when it is absent or blank. The
/// mux uses `-shortest`, so a narration longer than the slideshow is cut at
/// the video's end.
pub fn render_slideshow(text: &str, opts: &SlideshowOpts, out: &OutputDir) -> OffgenResult<PathBuf> {
    let slides: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if slides.is_empty() {
        return Err(OffgenError::validation("slideshow text must not be empty"));
    }
    if opts.seconds_per_slide == 0 {
        return Err(OffgenError::validation("seconds_per_slide must be non-zero"));
    }
    let frames_per_slide = opts.fps.checked_mul(opts.seconds_per_slide).ok_or_else(|| {
        OffgenError::validation(format!(
            "fps {} x seconds_per_slide {} overflows the frame count",
            opts.fps, opts.seconds_per_slide
        ))
    })?;

    let audio = match effective_narration(opts.narration.as_deref()) {
        Some(narration) => {
            let mp3 = synthesize_speech(narration, &opts.speech, out)?;
            let narration_secs = probe_audio_duration(&mp3)?;
            let video_secs = slides.len() as u32 * opts.seconds_per_slide;
            if narration_secs > f64::from(video_secs) {
                tracing::warn!(
                    narration_secs,
                    video_secs,
                    "narration is longer than the slideshow and will be cut short"
                );
            }
            Some(mp3)
        }
        None => None,
    };

    let out_path = out.unique_path("video", "mp4");
    let encode = EncodeOpts {
        width: opts.card.canvas.width,
        height: opts.card.canvas.height,
        fps: opts.fps,
        out_path: out_path.clone(),
        overwrite: true,
        audio,
    };
    let mut encoder = FfmpegEncoder::start(&encode)?;

    for slide in &slides {
        let frame = render_text_card(slide, &opts.card)?;
        for _ in 0..frames_per_slide {
            encoder.push_frame(&frame)?;
        }
    }
    encoder.finish()?;

    tracing::info!(
        path = %out_path.display(),
        slides = slides.len(),
        fps = opts.fps,
        "wrote slideshow"
    );
    Ok(out_path)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> OffgenResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(width: u32, height: u32, fps: u32) -> EncodeOpts {
        EncodeOpts {
            width,
            height,
            fps,
            out_path: PathBuf::from("out.mp4"),
            overwrite: true,
            audio: None,
        }
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        assert!(opts(511, 512, 24).validate().is_err());
        assert!(opts(512, 511, 24).validate().is_err());
        assert!(opts(512, 512, 24).validate().is_ok());
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(opts(512, 512, 0).validate().is_err());
    }

    #[test]
    fn slideshow_defaults_to_no_narration() {
        assert!(SlideshowOpts::default().narration.is_none());
    }

    #[test]
    fn blank_narration_means_silent_video() {
        assert_eq!(effective_narration(None), None);
        assert_eq!(effective_narration(Some("")), None);
        assert_eq!(effective_narration(Some("   \t")), None);
        assert_eq!(effective_narration(Some(" hello ")), Some("hello"));
    }

    #[test]
    fn overflowing_frame_count_is_a_validation_error() {
        let slideshow = SlideshowOpts {
            fps: u32::MAX,
            seconds_per_slide: 2,
            ..SlideshowOpts::default()
        };
        let out = crate::output::OutputDir::new(std::env::temp_dir()).unwrap();
        // Rejected before any frame is rendered or ffmpeg is spawned.
        let err = render_slideshow("slide", &slideshow, &out).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }
}
