//! Offline text-to-speech through the system `espeak-ng`/`espeak` binary,
//! transcoded to MP3 with `ffmpeg`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{OffgenError, OffgenResult};
use crate::output::OutputDir;

/// Synthesis options.
#[derive(Clone, Debug)]
pub struct SpeechOpts {
    /// Speaking rate in words per minute.
    pub rate_wpm: u32,
    /// Optional espeak voice name (e.g. `en-us`). `None` uses the default.
    pub voice: Option<String>,
}

impl Default for SpeechOpts {
    fn default() -> Self {
        Self {
            rate_wpm: 150,
            voice: None,
        }
    }
}

/// Find a usable espeak binary on `PATH`, preferring `espeak-ng`.
pub fn espeak_binary() -> Option<&'static str> {
    ["espeak-ng", "espeak"].into_iter().find(|bin| {
        Command::new(bin)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Synthesize `text` to an MP3 named `audio_*.mp3` under `out`.
///
/// espeak writes a WAV which ffmpeg then transcodes; the intermediate WAV is
/// removed on success.
pub fn synthesize_speech(text: &str, opts: &SpeechOpts, out: &OutputDir) -> OffgenResult<PathBuf> {
    if text.trim().is_empty() {
        return Err(OffgenError::validation("speech text must not be empty"));
    }

    let bin = espeak_binary().ok_or_else(|| {
        OffgenError::encode("narration requires espeak-ng or espeak on PATH")
    })?;

    let wav_path = out.unique_path("audio", "wav");
    let mut cmd = Command::new(bin);
    cmd.args(["-s", &opts.rate_wpm.to_string()]);
    if let Some(voice) = opts.voice.as_deref() {
        cmd.args(["-v", voice]);
    }
    cmd.arg("-w").arg(&wav_path).arg(text);
    let espeak_out = cmd
        .output()
        .map_err(|e| OffgenError::encode(format!("failed to run {bin}: {e}")))?;
    if !espeak_out.status.success() {
        return Err(OffgenError::encode(format!(
            "{bin} exited with status {}: {}",
            espeak_out.status,
            String::from_utf8_lossy(&espeak_out.stderr).trim()
        )));
    }

    let mp3_path = out.unique_path("audio", "mp3");
    let result = wav_to_mp3(&wav_path, &mp3_path);
    // The WAV is scratch either way.
    let _ = std::fs::remove_file(&wav_path);
    result?;

    tracing::info!(path = %mp3_path.display(), rate_wpm = opts.rate_wpm, "wrote narration");
    Ok(mp3_path)
}

fn wav_to_mp3(wav: &Path, mp3: &Path) -> OffgenResult<()> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-i"])
        .arg(wav)
        .args(["-codec:a", "libmp3lame", "-q:a", "4"])
        .arg(mp3)
        .output()
        .map_err(|e| OffgenError::encode(format!("failed to run ffmpeg for mp3 encode: {e}")))?;
    if !out.status.success() {
        return Err(OffgenError::encode(format!(
            "ffmpeg mp3 encode failed for '{}': {}",
            wav.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

/// Probe an audio file's duration in seconds through `ffprobe`.
pub fn probe_audio_duration(path: &Path) -> OffgenResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: ProbeFormat,
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| OffgenError::encode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(OffgenError::encode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| OffgenError::encode(format!("ffprobe json parse failed: {e}")))?;
    parsed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            OffgenError::encode(format!(
                "ffprobe reported no duration for '{}'",
                path.display()
            ))
        })
}

// No unit tests here: these functions shell out to `espeak`/`ffmpeg`/`ffprobe` and are best
// validated via integration tests that can be conditionally ignored when the tools are
// unavailable.
