use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, RevoiceError};

/// Replace the video's audio track with the given waveform.
///
/// The video stream is copied without re-encoding; the waveform is encoded
/// to AAC for the MP4 container. The audio is not truncated or padded to
/// the video length, so a duration mismatch plays through with mismatched
/// timing.
pub async fn replace_audio(video: &Path, audio: &Path, output: &Path) -> Result<()> {
    if !video.exists() {
        return Err(RevoiceError::FileNotFound(video.display().to_string()));
    }
    if !audio.exists() {
        return Err(RevoiceError::FileNotFound(audio.display().to_string()));
    }

    info!(
        "Remuxing {} with audio from {}",
        video.display(),
        audio.display()
    );

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(video)
        .arg("-i")
        .arg(audio)
        .args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            "aac",
        ])
        .arg(output)
        .status()
        .map_err(|e| RevoiceError::Remux(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(RevoiceError::Remux("FFmpeg remux failed".to_string()));
    }

    if !output.exists() {
        return Err(RevoiceError::Remux(
            "Output file was not created".to_string(),
        ));
    }

    debug!("Remuxed video written to {}", output.display());
    Ok(())
}
