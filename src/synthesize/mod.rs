pub mod google;

pub use google::GoogleTtsClient;

use crate::error::{Result, RevoiceError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// A speech-synthesis service.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into a waveform written at `output`. Returns the
    /// duration of the synthesized audio.
    async fn synthesize(&self, text: &str, output: &Path) -> Result<Duration>;

    fn name(&self) -> &'static str;
}

/// Read the duration of a WAV file. Also validates that the service
/// actually returned a parseable waveform.
pub fn wav_duration(path: &Path) -> Result<Duration> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| RevoiceError::Synthesis(format!("Invalid WAV at {}: {e}", path.display())))?;

    let spec = reader.spec();
    let samples = reader.duration(); // samples per channel
    Ok(Duration::from_secs_f64(
        samples as f64 / spec.sample_rate as f64,
    ))
}
