pub mod config;
pub mod correct;
pub mod error;
pub mod interactive;
pub mod media;
pub mod pipeline;
pub mod synthesize;
pub mod transcribe;

pub use config::Config;
pub use error::{Result, RevoiceError};
pub use pipeline::{
    print_summary, replace_voice, replace_voice_with_cancel, replace_voice_with_clients,
    RunResult, RunStats, DEFAULT_OUTPUT_NAME,
};
