//! Local transcription with whisper.cpp.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use voxql_config::SpeechConfig;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::decode::{TARGET_SAMPLE_RATE, decode_file};
use crate::{SpeechError, Transcriber, join_segments};

/// whisper.cpp transcriber.
///
/// The model is loaded on the first call and shared by every later call.
/// Each call runs on its own inference state, so concurrent transcriptions do
/// not share decoder state. Cloning is cheap and shares the loaded model.
#[derive(Clone)]
pub struct WhisperTranscriber {
    inner: Arc<Inner>,
}

struct Inner {
    model_path: PathBuf,
    language: String,
    threads: u16,
    context: Mutex<Option<Arc<WhisperContext>>>,
}

impl WhisperTranscriber {
    #[must_use]
    pub fn new(model_path: impl Into<PathBuf>, language: &str, threads: u16) -> Self {
        Self {
            inner: Arc::new(Inner {
                model_path: model_path.into(),
                language: language.to_string(),
                threads,
                context: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(&config.model_path, &config.language, config.threads)
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.inner.model_path
    }

    /// Whether the model has been loaded yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner
            .context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Decode and transcribe synchronously on the current thread.
    ///
    /// # Errors
    ///
    /// Decode, model-load, and inference failures.
    pub fn transcribe_blocking(&self, audio_path: &Path) -> Result<String, SpeechError> {
        let samples = decode_file(audio_path)?;
        self.inner.transcribe_samples(&samples)
    }
}

impl Inner {
    fn context(&self) -> Result<Arc<WhisperContext>, SpeechError> {
        let mut slot = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ctx) = slot.as_ref() {
            return Ok(Arc::clone(ctx));
        }

        let load_error = |message: String| SpeechError::ModelLoad {
            path: self.model_path.clone(),
            message,
        };
        if !self.model_path.is_file() {
            return Err(load_error("model file not found".to_string()));
        }
        let path = self
            .model_path
            .to_str()
            .ok_or_else(|| load_error("model path is not valid UTF-8".to_string()))?;

        let started = std::time::Instant::now();
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| load_error(e.to_string()))?;
        tracing::info!(
            model = %self.model_path.display(),
            elapsed_ms = started.elapsed().as_millis(),
            "whisper model loaded"
        );

        let ctx = Arc::new(ctx);
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    fn n_threads(&self) -> i32 {
        let threads = if self.threads == 0 {
            std::thread::available_parallelism()
                .map_or(1, std::num::NonZeroUsize::get)
                .min(4)
        } else {
            usize::from(self.threads)
        };
        i32::try_from(threads).unwrap_or(1)
    }

    fn transcribe_samples(&self, samples: &[f32]) -> Result<String, SpeechError> {
        let ctx = self.context()?;
        let mut state = ctx
            .create_state()
            .map_err(|e| SpeechError::Inference(format!("create state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if !self.language.is_empty() {
            params.set_language(Some(self.language.as_str()));
        }
        params.set_translate(false);
        params.set_n_threads(self.n_threads());
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        // whisper.cpp rejects clips shorter than one second.
        let min_len = TARGET_SAMPLE_RATE as usize;
        let mut padded;
        let input = if samples.len() < min_len {
            padded = samples.to_vec();
            padded.resize(min_len, 0.0);
            padded.as_slice()
        } else {
            samples
        };

        state
            .full(params, input)
            .map_err(|e| SpeechError::Inference(e.to_string()))?;

        let segments = (0..state.full_n_segments())
            .filter_map(|i| state.get_segment(i))
            .filter_map(|segment| segment.to_str_lossy().ok().map(|s| s.into_owned()));
        let transcript = join_segments(segments);

        tracing::debug!(chars = transcript.len(), "whisper transcription finished");
        Ok(transcript)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, SpeechError> {
        let this = self.clone();
        let path = audio_path.to_path_buf();
        tokio::task::spawn_blocking(move || this.transcribe_blocking(&path))
            .await
            .map_err(|e| SpeechError::Inference(format!("transcription task failed: {e}")))?
    }

    fn provider_name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tests::write_wav;

    #[test]
    fn missing_model_is_a_load_error_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.wav");
        write_wav(&audio, 16_000, 1, 1_600);
        let transcriber = WhisperTranscriber::new(dir.path().join("ggml-none.bin"), "en", 1);

        let err = transcriber.transcribe_blocking(&audio).unwrap_err();
        assert!(matches!(err, SpeechError::ModelLoad { .. }), "got {err:?}");
        assert!(err.to_string().contains("not found"));
        assert!(!transcriber.is_loaded());
    }

    #[test]
    fn decode_errors_surface_before_model_load() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = WhisperTranscriber::new(dir.path().join("ggml-none.bin"), "en", 1);

        let err = transcriber
            .transcribe_blocking(&dir.path().join("absent.wav"))
            .unwrap_err();
        assert!(matches!(err, SpeechError::Io(_)));
    }

    #[test]
    fn zero_threads_means_auto() {
        let transcriber = WhisperTranscriber::new("m.bin", "en", 0);
        let n = transcriber.inner.n_threads();
        assert!((1..=4).contains(&n));
    }

    #[test]
    #[ignore = "requires a ggml whisper model at models/ggml-base.bin"]
    fn silence_transcribes_to_empty_or_short_text() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("silence.wav");
        write_wav(&audio, 16_000, 1, 32_000);
        let transcriber = WhisperTranscriber::new("models/ggml-base.bin", "en", 0);

        let text = transcriber.transcribe_blocking(&audio).unwrap();
        assert!(transcriber.is_loaded());
        assert!(!text.starts_with(' '));
    }
}
