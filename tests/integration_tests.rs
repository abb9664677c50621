//! Integration tests for revoice.
//!
//! The full-pipeline tests use stub service clients and a tiny generated
//! video, so no API keys are needed. Tests that need FFmpeg skip when it
//! is not installed.

use async_trait::async_trait;
use revoice::config::Config;
use revoice::correct::Corrector;
use revoice::error::{Result, RevoiceError};
use revoice::media::{validate_input, SUPPORTED_EXTENSIONS};
use revoice::pipeline::{replace_voice_with_clients, DEFAULT_OUTPUT_NAME};
use revoice::synthesize::Synthesizer;
use revoice::transcribe::Transcriber;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Config Integration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.voice, "en-US-Standard-C");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_credential_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.google_api_key = Some("g-test".to_string());
        assert!(config.validate().is_err());

        config.openai_api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(DEFAULT_OUTPUT_NAME, "output_video.mp4");
    }
}

// ============================================================================
// Ingress Tests
// ============================================================================

mod ingress_tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(SUPPORTED_EXTENSIONS, &["mp4", "mov"]);
    }

    #[test]
    fn test_validate_input_rejects_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.avi");
        std::fs::write(&path, b"x").unwrap();

        assert!(matches!(
            validate_input(&path),
            Err(RevoiceError::Ingress(_))
        ));
    }

    #[test]
    fn test_validate_input_rejects_missing() {
        assert!(matches!(
            validate_input(Path::new("/no/such/clip.mp4")),
            Err(RevoiceError::FileNotFound(_))
        ));
    }
}

// ============================================================================
// Full Pipeline Tests (stub clients, generated media)
// ============================================================================

/// Transcriber stub that records the path it was handed.
struct StubTranscriber {
    text: String,
    seen: Arc<Mutex<Option<PathBuf>>>,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        *self.seen.lock().unwrap() = Some(audio.to_path_buf());
        Ok(self.text.clone())
    }

    fn name(&self) -> &'static str {
        "stub-stt"
    }
}

struct StubCorrector {
    reply: Option<String>,
}

#[async_trait]
impl Corrector for StubCorrector {
    async fn correct(&self, transcript: &str) -> Result<String> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(RevoiceError::Correction(format!(
                "simulated network error ({} chars in)",
                transcript.len()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "stub-llm"
    }
}

/// Synthesizer stub that writes one second of silence.
struct StubSynthesizer;

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn synthesize(&self, _text: &str, output: &Path) -> Result<Duration> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(output, spec)
            .map_err(|e| RevoiceError::Synthesis(e.to_string()))?;
        for _ in 0..16_000 {
            writer
                .write_sample(0i16)
                .map_err(|e| RevoiceError::Synthesis(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| RevoiceError::Synthesis(e.to_string()))?;
        Ok(Duration::from_secs(1))
    }

    fn name(&self) -> &'static str {
        "stub-tts"
    }
}

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Generate a two-second test clip with a video track and a sine-tone
/// audio track.
fn generate_test_video(path: &Path) -> bool {
    Command::new("ffmpeg")
        .args(["-y", "-f", "lavfi", "-i", "color=c=black:s=64x64:d=2"])
        .args(["-f", "lavfi", "-i", "sine=frequency=440:duration=2"])
        .args(["-c:v", "mpeg4", "-c:a", "aac", "-shortest"])
        .arg(path)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Generate a clip with a video track and no audio track.
fn generate_silent_video(path: &Path) -> bool {
    Command::new("ffmpeg")
        .args(["-y", "-f", "lavfi", "-i", "color=c=black:s=64x64:d=2"])
        .args(["-c:v", "mpeg4", "-an"])
        .arg(path)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_run_replaces_audio_and_cleans_up() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        if !generate_test_video(&input) {
            eprintln!("Skipping test: could not generate test video");
            return;
        }
        let output = dir.path().join("output_video.mp4");

        let seen = Arc::new(Mutex::new(None));
        let transcriber = Box::new(StubTranscriber {
            text: "helo wrld".to_string(),
            seen: seen.clone(),
        });
        let corrector = Box::new(StubCorrector {
            reply: Some("Hello world".to_string()),
        });

        let result = replace_voice_with_clients(
            &input,
            &output,
            transcriber,
            corrector,
            Box::new(StubSynthesizer),
            Arc::new(AtomicBool::new(false)),
            false,
        )
        .await
        .expect("pipeline should succeed");

        assert!(output.exists());
        assert_eq!(result.output_path, output);
        assert_eq!(result.stats.transcript_chars, "helo wrld".len());
        assert_eq!(result.stats.corrected_chars, "Hello world".len());
        assert_eq!(result.stats.synthesized_duration, Duration::from_secs(1));

        // The extracted WAV lived in the run's temp directory, which is
        // gone once the run completes.
        let audio_path = seen.lock().unwrap().clone().expect("transcriber was called");
        assert!(!audio_path.exists());
    }

    #[tokio::test]
    async fn test_correction_failure_aborts_and_cleans_up() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        if !generate_test_video(&input) {
            eprintln!("Skipping test: could not generate test video");
            return;
        }
        let output = dir.path().join("output_video.mp4");

        let seen = Arc::new(Mutex::new(None));
        let transcriber = Box::new(StubTranscriber {
            text: "helo wrld".to_string(),
            seen: seen.clone(),
        });
        let corrector = Box::new(StubCorrector { reply: None });

        let result = replace_voice_with_clients(
            &input,
            &output,
            transcriber,
            corrector,
            Box::new(StubSynthesizer),
            Arc::new(AtomicBool::new(false)),
            false,
        )
        .await;

        assert!(matches!(result, Err(RevoiceError::Correction(_))));

        // No partial output, and the extracted WAV was cleaned up even
        // though the run never reached synthesis.
        assert!(!output.exists());
        let audio_path = seen.lock().unwrap().clone().expect("transcriber was called");
        assert!(!audio_path.exists());
    }

    #[tokio::test]
    async fn test_video_without_audio_track_fails_extraction() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        if !generate_silent_video(&input) {
            eprintln!("Skipping test: could not generate test video");
            return;
        }
        let output = dir.path().join("output_video.mp4");

        let seen = Arc::new(Mutex::new(None));
        let result = replace_voice_with_clients(
            &input,
            &output,
            Box::new(StubTranscriber {
                text: String::new(),
                seen: seen.clone(),
            }),
            Box::new(StubCorrector { reply: None }),
            Box::new(StubSynthesizer),
            Arc::new(AtomicBool::new(false)),
            false,
        )
        .await;

        assert!(matches!(result, Err(RevoiceError::AudioExtraction(_))));
        assert!(!output.exists());
        // The run never reached transcription
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancellation_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        std::fs::write(&input, b"x").unwrap();

        let cancelled = Arc::new(AtomicBool::new(true));
        let result = replace_voice_with_clients(
            &input,
            &dir.path().join("out.mp4"),
            Box::new(StubTranscriber {
                text: String::new(),
                seen: Arc::new(Mutex::new(None)),
            }),
            Box::new(StubCorrector { reply: None }),
            Box::new(StubSynthesizer),
            cancelled,
            false,
        )
        .await;

        assert!(matches!(result, Err(RevoiceError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_not_an_error() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        if !generate_test_video(&input) {
            eprintln!("Skipping test: could not generate test video");
            return;
        }
        let output = dir.path().join("output_video.mp4");

        // Unintelligible audio: recognition yields an empty string, the
        // correction echoes it, and the run still completes.
        let result = replace_voice_with_clients(
            &input,
            &output,
            Box::new(StubTranscriber {
                text: String::new(),
                seen: Arc::new(Mutex::new(None)),
            }),
            Box::new(StubCorrector {
                reply: Some(String::new()),
            }),
            Box::new(StubSynthesizer),
            Arc::new(AtomicBool::new(false)),
            false,
        )
        .await
        .expect("pipeline should succeed on silent audio");

        assert!(output.exists());
        assert_eq!(result.stats.transcript_chars, 0);
        assert_eq!(result.stats.corrected_chars, 0);
    }
}
