pub mod extract;
pub mod remux;

pub use extract::{
    check_ffmpeg, check_ffprobe, extract_audio, get_media_duration, has_audio_stream,
};
pub use remux::replace_audio;

use crate::error::{Result, RevoiceError};
use std::path::Path;
use std::time::Duration;

/// Input container formats accepted at ingress.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mov"];

/// Metadata about an extracted audio track.
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Validate the uploaded video path: it must exist and carry a supported
/// container extension.
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(RevoiceError::FileNotFound(input.display().to_string()));
    }

    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext {
        Some(ref e) if SUPPORTED_EXTENSIONS.contains(&e.as_str()) => Ok(()),
        Some(e) => Err(RevoiceError::Ingress(format!(
            "Unsupported container '.{e}'. Supported: mp4, mov"
        ))),
        None => Err(RevoiceError::Ingress(format!(
            "Input has no file extension: {}",
            input.display()
        ))),
    }
}
