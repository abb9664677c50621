use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, RevoiceError};

use super::AudioMetadata;

/// Sample rate of the extracted waveform. 16 kHz mono PCM is what the
/// recognition service is configured for.
pub const EXTRACT_SAMPLE_RATE: u32 = 16_000;

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg").arg("-version").output().map_err(|e| {
        RevoiceError::AudioExtraction(format!(
            "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(RevoiceError::AudioExtraction(
            "FFmpeg check failed".to_string(),
        ));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe").arg("-version").output().map_err(|e| {
        RevoiceError::AudioExtraction(format!(
            "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(RevoiceError::AudioExtraction(
            "FFprobe check failed".to_string(),
        ));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get container duration using FFprobe.
pub fn get_media_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| RevoiceError::AudioExtraction(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RevoiceError::AudioExtraction(format!(
            "FFprobe failed: {stderr}"
        )));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    parse_duration_secs(&duration_str)
}

/// Parse ffprobe's `format=duration` output (seconds as a decimal string).
fn parse_duration_secs(raw: &str) -> Result<Duration> {
    let duration_secs: f64 = raw.trim().parse().map_err(|e| {
        RevoiceError::AudioExtraction(format!("Failed to parse duration '{}': {e}", raw.trim()))
    })?;

    Ok(Duration::from_secs_f64(duration_secs))
}

/// Check whether the input has at least one audio stream.
pub fn has_audio_stream(input: &Path) -> Result<bool> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "a",
            "-show_entries",
            "stream=codec_type",
            "-of",
            "csv=p=0",
        ])
        .arg(input)
        .output()
        .map_err(|e| RevoiceError::AudioExtraction(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RevoiceError::AudioExtraction(format!(
            "FFprobe failed: {stderr}"
        )));
    }

    Ok(parse_stream_listing(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_stream_listing(raw: &str) -> bool {
    raw.lines().any(|l| l.trim() == "audio")
}

/// Demux the audio track from a video file into a 16-bit linear PCM WAV.
///
/// The output is mono 16 kHz, which is what the recognition service expects.
/// Fails if the input has no audio track or is unreadable.
pub async fn extract_audio(input: &Path, output: &Path) -> Result<AudioMetadata> {
    check_ffmpeg()?;
    check_ffprobe()?;

    if !input.exists() {
        return Err(RevoiceError::FileNotFound(input.display().to_string()));
    }

    if !has_audio_stream(input)? {
        return Err(RevoiceError::AudioExtraction(format!(
            "No audio track in {}",
            input.display()
        )));
    }

    info!("Extracting audio from {}", input.display());

    let duration = get_media_duration(input)?;
    debug!("Input duration: {:?}", duration);

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args([
            "-vn",
            "-acodec",
            "pcm_s16le",
            "-ar",
            "16000",
            "-ac",
            "1",
        ])
        .arg(output)
        .status()
        .map_err(|e| RevoiceError::AudioExtraction(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(RevoiceError::AudioExtraction(
            "FFmpeg audio extraction failed".to_string(),
        ));
    }

    if !output.exists() {
        return Err(RevoiceError::AudioExtraction(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio extracted to {}", output.display());

    Ok(AudioMetadata {
        duration,
        sample_rate: EXTRACT_SAMPLE_RATE,
        channels: 1,
    })
}
