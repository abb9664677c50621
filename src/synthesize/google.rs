use crate::error::{Result, RevoiceError};
use crate::synthesize::{wav_duration, Synthesizer};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Google Cloud Text-to-Speech synthesis endpoint.
const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Google Cloud Text-to-Speech client.
pub struct GoogleTtsClient {
    client: reqwest::Client,
    api_key: String,
    language: String,
    voice: String,
    endpoint: String,
}

impl GoogleTtsClient {
    /// Create a new client with the given API key and per-request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            language: "en-US".to_string(),
            voice: "en-US-Standard-C".to_string(),
            endpoint: SYNTHESIZE_URL.to_string(),
        })
    }

    /// Set the synthesis language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the named voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Override the API endpoint (used by tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, text: &str) -> SynthesizeRequest {
        SynthesizeRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: self.language.clone(),
                name: self.voice.clone(),
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16".to_string(),
            },
        }
    }
}

#[async_trait]
impl Synthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str, output: &Path) -> Result<Duration> {
        let request = self.build_request(text);
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        debug!(
            "Synthesizing {} chars with voice {}",
            text.len(),
            self.voice
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RevoiceError::Synthesis(format!("TTS API request failed: {e}")))?;

        let status = response.status();
        debug!("TTS API response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RevoiceError::Synthesis(format!(
                "TTS API error ({status}): {error_body}"
            )));
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| RevoiceError::Synthesis(format!("Malformed TTS API response: {e}")))?;
        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| {
                RevoiceError::Synthesis(format!("TTS returned invalid base64 audio: {e}"))
            })?;

        fs::write(output, &audio_bytes).await?;

        let duration = wav_duration(output)?;
        debug!(
            "Synthesized {:.1}s of audio to {}",
            duration.as_secs_f64(),
            output.display()
        );

        Ok(duration)
    }

    fn name(&self) -> &'static str {
        "Google Text-to-Speech"
    }
}

// Request/Response types

#[derive(Serialize)]
struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceSelectionParams,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams {
    language_code: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: String,
}

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}
