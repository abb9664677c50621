use crate::correct::Corrector;
use crate::error::{Result, RevoiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// OpenAI chat completions endpoint.
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Instruction prepended to the raw transcript.
const INSTRUCTION_PREFIX: &str = "Correct this transcription: ";

/// OpenAI chat completions client for transcript correction.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiChatClient {
    /// Create a new client with the given API key and per-request timeout.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model: "gpt-4o".to_string(),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint (used by tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, transcript: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!("{INSTRUCTION_PREFIX}{transcript}"),
            }],
        }
    }

    /// Take the first choice's message content verbatim.
    fn first_choice(response: ChatResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                RevoiceError::Correction("Chat API returned no choices".to_string())
            })
    }
}

#[async_trait]
impl Corrector for OpenAiChatClient {
    async fn correct(&self, transcript: &str) -> Result<String> {
        let request = self.build_request(transcript);

        debug!(
            "Requesting correction from {} ({} chars)",
            self.model,
            transcript.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| RevoiceError::Correction(format!("Chat API request failed: {e}")))?;

        let status = response.status();
        debug!("Chat API response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RevoiceError::Correction(format!(
                "Chat API error ({status}): {error_body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RevoiceError::Correction(format!("Malformed Chat API response: {e}")))?;
        Self::first_choice(parsed)
    }

    fn name(&self) -> &'static str {
        "OpenAI Chat"
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
