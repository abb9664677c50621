pub mod google;

pub use google::GoogleSpeechClient;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// A speech-recognition service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the waveform at `audio` into plain text.
    ///
    /// Returns an empty string when the service recognizes no speech; that
    /// is not an error.
    async fn transcribe(&self, audio: &Path) -> Result<String>;

    fn name(&self) -> &'static str;
}
