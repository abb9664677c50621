use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use revoice::config::Config;
use revoice::interactive;
use revoice::pipeline::{self, DEFAULT_OUTPUT_NAME};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "revoice")]
#[command(version, about = "Replace a video's voice track with an AI voice")]
#[command(
    long_about = "Upload a video and we'll clean up its audio: the speech is transcribed, \
corrected by a language model, re-synthesized, and spliced back into the video."
)]
struct Cli {
    /// Input video file (mp4 or mov). Omit to run the interactive wizard.
    input: Option<PathBuf>,

    /// Output video file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Chat model used for transcript correction
    #[arg(long)]
    model: Option<String>,

    /// Synthesis voice name
    #[arg(long)]
    voice: Option<String>,

    /// Language code for recognition and synthesis
    #[arg(short, long)]
    language: Option<String>,

    /// Per-request timeout for external services, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let (input, output, mut config) = match cli.input {
        Some(input) => {
            let config = Config::load().context("Failed to load configuration")?;
            (input, cli.output, config)
        }
        None => {
            let wizard = interactive::run_interactive_wizard()?;
            (wizard.input, wizard.output, wizard.config)
        }
    };

    // CLI flags override file/env configuration
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(voice) = cli.voice {
        config.voice = voice;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Input:    {}", input.display());
    info!("Output:   {}", output.display());
    info!("Language: {}", config.language);
    info!("Voice:    {}", config.voice);
    info!("Model:    {}", config.model);

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    })
    .context("Failed to install Ctrl-C handler")?;

    match pipeline::replace_voice_with_cancel(&input, &output, &config, cancelled, true).await {
        Ok(result) => {
            pipeline::print_summary(&result);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{} [{}] {}",
                style("error:").red().bold(),
                e.stage(),
                e
            );
            Err(e.into())
        }
    }
}
