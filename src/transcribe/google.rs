use crate::error::{Result, RevoiceError};
use crate::media::extract::EXTRACT_SAMPLE_RATE;
use crate::transcribe::Transcriber;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Google Cloud Speech-to-Text synchronous recognition endpoint.
const RECOGNIZE_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Google Cloud Speech-to-Text client.
pub struct GoogleSpeechClient {
    client: reqwest::Client,
    api_key: String,
    language: String,
    endpoint: String,
}

impl GoogleSpeechClient {
    /// Create a new client with the given API key and per-request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            language: "en-US".to_string(),
            endpoint: RECOGNIZE_URL.to_string(),
        })
    }

    /// Set the recognition language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Override the API endpoint (used by tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, audio_bytes: &[u8]) -> RecognizeRequest {
        RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16".to_string(),
                sample_rate_hertz: EXTRACT_SAMPLE_RATE,
                language_code: self.language.clone(),
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio_bytes),
            },
        }
    }

    /// Join the top alternative of every result, in service order, with
    /// single spaces. An empty result list yields an empty string.
    fn join_results(response: &RecognizeResponse) -> String {
        response
            .results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechClient {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let audio_bytes = fs::read(audio).await?;
        debug!("Sending {} bytes for recognition", audio_bytes.len());

        let request = self.build_request(&audio_bytes);
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RevoiceError::Transcription(format!("Speech API request failed: {e}")))?;

        let status = response.status();
        debug!("Speech API response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RevoiceError::Transcription(format!(
                "Speech API error ({status}): {error_body}"
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RevoiceError::Transcription(format!("Malformed Speech API response: {e}")))?;
        let transcript = Self::join_results(&parsed);

        debug!(
            "Recognized {} results, {} chars",
            parsed.results.len(),
            transcript.len()
        );

        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "Google Speech-to-Text"
    }
}

// Request/Response types

#[derive(Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: String,
    sample_rate_hertz: u32,
    language_code: String,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Deserialize)]
struct SpeechRecognitionAlternative {
    #[serde(default)]
    transcript: String,
}
