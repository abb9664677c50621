use thiserror::Error;

#[derive(Error, Debug)]
pub enum RevoiceError {
    #[error("Unsupported or unreadable input: {0}")]
    Ingress(String),

    #[error("Audio extraction failed: {0}")]
    AudioExtraction(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcript correction failed: {0}")]
    Correction(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Remux failed: {0}")]
    Remux(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RevoiceError {
    /// Name of the pipeline stage this error belongs to, for user-facing
    /// messages and the run summary.
    pub fn stage(&self) -> &'static str {
        match self {
            RevoiceError::Ingress(_) | RevoiceError::FileNotFound(_) => "ingress",
            RevoiceError::AudioExtraction(_) => "extract",
            RevoiceError::Transcription(_) => "transcribe",
            RevoiceError::Correction(_) => "correct",
            RevoiceError::Synthesis(_) => "synthesize",
            RevoiceError::Remux(_) => "remux",
            RevoiceError::Config(_) => "config",
            RevoiceError::Cancelled => "cancelled",
            RevoiceError::Io(_) | RevoiceError::Http(_) | RevoiceError::Json(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, RevoiceError>;
