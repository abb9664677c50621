use crate::config::Config;
use crate::correct::{Corrector, OpenAiChatClient};
use crate::error::{Result, RevoiceError};
use crate::media::{check_ffmpeg, check_ffprobe, extract_audio, replace_audio, validate_input};
use crate::synthesize::{GoogleTtsClient, Synthesizer};
use crate::transcribe::{GoogleSpeechClient, Transcriber};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Default name of the final video, regardless of the input container.
pub const DEFAULT_OUTPUT_NAME: &str = "output_video.mp4";

/// Statistics from a voice replacement run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Total time taken for the entire pipeline.
    pub total_time: Duration,
    /// Time taken for audio extraction.
    pub extraction_time: Duration,
    /// Time taken for transcription.
    pub transcription_time: Duration,
    /// Time taken for transcript correction.
    pub correction_time: Duration,
    /// Time taken for speech synthesis.
    pub synthesis_time: Duration,
    /// Time taken for the final remux.
    pub remux_time: Duration,
    /// Duration of the input video.
    pub video_duration: Duration,
    /// Duration of the synthesized audio track.
    pub synthesized_duration: Duration,
    /// Length of the raw transcript, in characters.
    pub transcript_chars: usize,
    /// Length of the corrected transcript, in characters.
    pub corrected_chars: usize,
}

/// Result of a voice replacement run.
#[derive(Debug)]
pub struct RunResult {
    /// Path to the final video.
    pub output_path: PathBuf,
    /// Run statistics.
    pub stats: RunStats,
}

/// Replace the voice track of `input`, writing the final video to `output`.
///
/// This is the main entry point. It:
/// 1. Extracts the audio track to a temp WAV
/// 2. Transcribes it with the speech-recognition service
/// 3. Corrects the transcript with the text-generation service
/// 4. Synthesizes the corrected text with the speech-synthesis service
/// 5. Remuxes the synthesized audio into the original video
///
/// All intermediate files live in one per-run temp directory that is
/// removed on every exit path.
pub async fn replace_voice(input: &Path, output: &Path, config: &Config) -> Result<RunResult> {
    let cancelled = Arc::new(AtomicBool::new(false));
    replace_voice_with_cancel(input, output, config, cancelled, true).await
}

/// Replace the voice track with cancellation support.
///
/// `cancelled` is checked between stages; an in-flight service call is
/// still bounded by the configured request timeout.
pub async fn replace_voice_with_cancel(
    input: &Path,
    output: &Path,
    config: &Config,
    cancelled: Arc<AtomicBool>,
    show_progress: bool,
) -> Result<RunResult> {
    config.validate()?;

    let transcriber = build_transcriber(config)?;
    let corrector = build_corrector(config)?;
    let synthesizer = build_synthesizer(config)?;

    replace_voice_with_clients(
        input,
        output,
        transcriber,
        corrector,
        synthesizer,
        cancelled,
        show_progress,
    )
    .await
}

/// Run the pipeline with explicit service clients.
pub async fn replace_voice_with_clients(
    input: &Path,
    output: &Path,
    transcriber: Box<dyn Transcriber>,
    corrector: Box<dyn Corrector>,
    synthesizer: Box<dyn Synthesizer>,
    cancelled: Arc<AtomicBool>,
    show_progress: bool,
) -> Result<RunResult> {
    let start_time = Instant::now();

    validate_input(input)?;
    check_cancelled(&cancelled)?;

    check_ffmpeg().map_err(|_| {
        RevoiceError::AudioExtraction(
            "FFmpeg not found. Install it with: brew install ffmpeg (macOS) or apt install ffmpeg (Linux)".to_string()
        )
    })?;
    check_ffprobe()?;

    // All intermediate files live here; the directory is deleted when this
    // guard drops, on success and on every error path.
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path();
    debug!("Using temp directory: {:?}", temp_path);

    let multi_progress = if show_progress {
        Some(MultiProgress::new())
    } else {
        None
    };

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Audio Extraction
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 1/5: Extracting audio from {:?}", input);
    let extraction_start = Instant::now();
    let pb = stage_spinner(&multi_progress, "Extracting audio...");

    let audio_path = temp_path.join("audio.wav");
    let audio_metadata = extract_audio(input, &audio_path).await?;

    finish_spinner(
        pb,
        format!(
            "✓ Audio extracted ({:.1}s)",
            audio_metadata.duration.as_secs_f64()
        ),
    );
    let extraction_time = extraction_start.elapsed();

    check_cancelled(&cancelled)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Transcription
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 2/5: Transcribing with {}", transcriber.name());
    let transcription_start = Instant::now();
    let pb = stage_spinner(&multi_progress, "Transcribing audio...");

    let transcript = transcriber.transcribe(&audio_path).await?;

    if transcript.is_empty() {
        // Silent or unintelligible audio. Not an error; the run continues
        // and synthesizes (near-)silence.
        info!("No speech recognized in the audio track");
    }

    finish_spinner(pb, format!("✓ Transcribed ({} chars)", transcript.len()));
    let transcription_time = transcription_start.elapsed();

    check_cancelled(&cancelled)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Correction
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 3/5: Correcting transcript with {}", corrector.name());
    let correction_start = Instant::now();
    let pb = stage_spinner(&multi_progress, "Correcting transcription...");

    let corrected = corrector.correct(&transcript).await?;

    if corrected.is_empty() && !transcript.is_empty() {
        warn!("Model returned an empty correction; using it verbatim");
    }

    finish_spinner(pb, format!("✓ Corrected ({} chars)", corrected.len()));
    let correction_time = correction_start.elapsed();

    check_cancelled(&cancelled)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 4: Synthesis
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 4/5: Synthesizing speech with {}", synthesizer.name());
    let synthesis_start = Instant::now();
    let pb = stage_spinner(&multi_progress, "Generating new audio...");

    let synthesized_path = temp_path.join("synthesized.wav");
    let synthesized_duration = synthesizer.synthesize(&corrected, &synthesized_path).await?;

    let drift = abs_diff(audio_metadata.duration, synthesized_duration);
    if drift > Duration::from_secs(1) {
        warn!(
            "Synthesized audio is {:.1}s, video is {:.1}s; output timing will not match",
            synthesized_duration.as_secs_f64(),
            audio_metadata.duration.as_secs_f64()
        );
    }

    finish_spinner(
        pb,
        format!("✓ Synthesized ({:.1}s)", synthesized_duration.as_secs_f64()),
    );
    let synthesis_time = synthesis_start.elapsed();

    check_cancelled(&cancelled)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 5: Remux
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 5/5: Replacing audio in video");
    let remux_start = Instant::now();
    let pb = stage_spinner(&multi_progress, "Replacing audio in video...");

    // The final video is staged in the temp directory first, then handed to
    // the caller's path, so a failed remux never leaves a partial output.
    let staged_output = temp_path.join("output.mp4");
    replace_audio(input, &synthesized_path, &staged_output).await?;

    fs::copy(&staged_output, output)
        .map_err(|e| RevoiceError::Remux(format!("Failed to write {}: {e}", output.display())))?;

    finish_spinner(pb, format!("✓ Wrote {}", output.display()));
    let remux_time = remux_start.elapsed();

    info!("Wrote final video to {:?}", output);

    let stats = RunStats {
        total_time: start_time.elapsed(),
        extraction_time,
        transcription_time,
        correction_time,
        synthesis_time,
        remux_time,
        video_duration: audio_metadata.duration,
        synthesized_duration,
        transcript_chars: transcript.len(),
        corrected_chars: corrected.len(),
    };

    // Best-effort: a failed delete is logged, never raised.
    if let Err(e) = temp_dir.close() {
        warn!("Failed to clean up temp directory: {e}");
    }

    Ok(RunResult {
        output_path: output.to_path_buf(),
        stats,
    })
}

fn check_cancelled(cancelled: &AtomicBool) -> Result<()> {
    if cancelled.load(Ordering::Relaxed) {
        return Err(RevoiceError::Cancelled);
    }
    Ok(())
}

fn abs_diff(a: Duration, b: Duration) -> Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}

fn build_transcriber(config: &Config) -> Result<Box<dyn Transcriber>> {
    let api_key = config.google_api_key.as_ref().ok_or_else(|| {
        RevoiceError::Config(
            "Google API key not set. Set GOOGLE_API_KEY environment variable.".to_string(),
        )
    })?;

    Ok(Box::new(
        GoogleSpeechClient::new(api_key.clone(), config.request_timeout())?
            .with_language(config.language.clone()),
    ))
}

fn build_corrector(config: &Config) -> Result<Box<dyn Corrector>> {
    let api_key = config.openai_api_key.as_ref().ok_or_else(|| {
        RevoiceError::Config(
            "OpenAI API key not set. Set OPENAI_API_KEY environment variable.".to_string(),
        )
    })?;

    Ok(Box::new(
        OpenAiChatClient::new(api_key.clone(), config.request_timeout())?
            .with_model(config.model.clone()),
    ))
}

fn build_synthesizer(config: &Config) -> Result<Box<dyn Synthesizer>> {
    let api_key = config.google_api_key.as_ref().ok_or_else(|| {
        RevoiceError::Config(
            "Google API key not set. Set GOOGLE_API_KEY environment variable.".to_string(),
        )
    })?;

    Ok(Box::new(
        GoogleTtsClient::new(api_key.clone(), config.request_timeout())?
            .with_language(config.language.clone())
            .with_voice(config.voice.clone()),
    ))
}

fn stage_spinner(multi_progress: &Option<MultiProgress>, message: &str) -> Option<ProgressBar> {
    multi_progress.as_ref().map(|mp| {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

fn finish_spinner(pb: Option<ProgressBar>, message: String) {
    if let Some(pb) = pb {
        pb.finish_with_message(message);
    }
}

/// Print a summary of the run.
pub fn print_summary(result: &RunResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    Voice Replacement Complete                  ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!(
        "  Video:      {:.1}s",
        result.stats.video_duration.as_secs_f64()
    );
    println!(
        "  New audio:  {:.1}s",
        result.stats.synthesized_duration.as_secs_f64()
    );
    println!(
        "  Transcript: {} chars raw, {} chars corrected",
        result.stats.transcript_chars, result.stats.corrected_chars
    );
    println!();
    println!("  Timing:");
    println!(
        "    Extract:     {:.2}s",
        result.stats.extraction_time.as_secs_f64()
    );
    println!(
        "    Transcribe:  {:.2}s",
        result.stats.transcription_time.as_secs_f64()
    );
    println!(
        "    Correct:     {:.2}s",
        result.stats.correction_time.as_secs_f64()
    );
    println!(
        "    Synthesize:  {:.2}s",
        result.stats.synthesis_time.as_secs_f64()
    );
    println!(
        "    Remux:       {:.2}s",
        result.stats.remux_time.as_secs_f64()
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
