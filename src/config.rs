use crate::error::{Result, RevoiceError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default chat model used for transcript correction.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default voice for speech synthesis.
pub const DEFAULT_VOICE: &str = "en-US-Standard-C";

/// Default language code for recognition and synthesis.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default per-request timeout for the external services, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for Google Cloud Speech-to-Text and Text-to-Speech.
    pub google_api_key: Option<String>,
    /// API key for the OpenAI chat completions API.
    pub openai_api_key: Option<String>,
    /// Chat model identifier for transcript correction.
    pub model: String,
    /// Named synthesis voice.
    pub voice: String,
    /// Language code for both recognition and synthesis.
    pub language: String,
    /// Per-request timeout for external service calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            config.google_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("REVOICE_MODEL") {
            config.model = model;
        }
        if let Ok(voice) = std::env::var("REVOICE_VOICE") {
            config.voice = voice;
        }
        if let Ok(language) = std::env::var("REVOICE_LANGUAGE") {
            config.language = language;
        }
        if let Ok(timeout) = std::env::var("REVOICE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.timeout_secs = t;
            }
        }

        Ok(config)
    }

    /// Fail fast before the pipeline starts: both service credentials are
    /// required and have no default value.
    pub fn validate(&self) -> Result<()> {
        if self.google_api_key.is_none() {
            return Err(RevoiceError::Config(
                "GOOGLE_API_KEY not set. Export it with: export GOOGLE_API_KEY=...".to_string(),
            ));
        }

        if self.openai_api_key.is_none() {
            return Err(RevoiceError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(RevoiceError::Config(
                "Timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("revoice").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.voice, "en-US-Standard-C");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.google_api_key.is_none());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_validate_missing_keys() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.google_api_key = Some("g-test".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_with_keys() {
        let mut config = Config::default();
        config.google_api_key = Some("g-test".to_string());
        config.openai_api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.google_api_key = Some("g-test".to_string());
        config.openai_api_key = Some("sk-test".to_string());
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout() {
        let mut config = Config::default();
        config.timeout_secs = 30;
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
