pub mod openai;

pub use openai::OpenAiChatClient;

use crate::error::Result;
use async_trait::async_trait;

/// A text-generation service used to clean up a raw transcript.
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Return the corrected transcript. The model's output is used
    /// verbatim, with no plausibility check.
    async fn correct(&self, transcript: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}
