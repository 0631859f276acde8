//! Speech-to-text seam
//!
//! The pipeline only needs text. [`Transcriber`] is the boundary to whatever produces it; the
//! Whisper implementation and the WAV reader are compiled with the `whisper` feature.

use crate::Error;

/// Whisper models expect 16 kHz mono samples.
pub const SAMPLE_RATE_HZ: u32 = 16000;

/// Vocabulary hint handed to the recognizer so callsigns and fix names come out spelled the
/// way the normalizer expects.
pub const ATC_INITIAL_PROMPT: &str = "Air traffic control instructions. Callsigns: skywest, \
    delta, american, united, southwest, jetblue. Phrases: descend and maintain, climb and \
    maintain, turn left heading, turn right heading, cleared direct, expect ils runway, \
    cleared rnav runway, contact tower, squawk, ident, flight level.";

pub trait Transcriber {
    /// Text for 16 kHz mono samples. Silence may yield an empty string.
    fn transcribe(&self, samples: &[f32]) -> Result<String, Error>;
}

impl<F> Transcriber for F
where
    F: Fn(&[f32]) -> Result<String, Error>,
{
    fn transcribe(&self, samples: &[f32]) -> Result<String, Error> {
        self(samples)
    }
}

#[cfg(feature = "whisper")]
pub use whisper::{SpeechToText, SpeechToTextConfig, read_wav_file};

#[cfg(feature = "whisper")]
mod whisper {
    use std::path::{Path, PathBuf};

    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    use super::{ATC_INITIAL_PROMPT, SAMPLE_RATE_HZ, Transcriber};
    use crate::Error;

    const WHISPER_NUM_THREADS: i32 = 2;

    #[derive(Debug, Clone)]
    pub struct SpeechToTextConfig {
        pub model_path: PathBuf,
        pub initial_prompt: String,
    }

    impl SpeechToTextConfig {
        pub fn new(model_path: impl Into<PathBuf>) -> Self {
            Self {
                model_path: model_path.into(),
                initial_prompt: ATC_INITIAL_PROMPT.to_owned(),
            }
        }
    }

    /// Whisper transcription with a model loaded once up front.
    pub struct SpeechToText {
        context: WhisperContext,
        config: SpeechToTextConfig,
    }

    impl SpeechToText {
        pub fn new(config: SpeechToTextConfig) -> Result<Self, Error> {
            let model_path = config
                .model_path
                .to_str()
                .ok_or_else(|| Error::WhisperError(format!("{:?} is not UTF-8", config.model_path)))?;
            let context =
                WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                    .map_err(|e| {
                        Error::WhisperError(format!("Failed to create Whisper context: {e}"))
                    })?;
            log::info!("Loaded Whisper model {:?}", config.model_path);
            Ok(Self { context, config })
        }
    }

    impl Transcriber for SpeechToText {
        fn transcribe(&self, samples: &[f32]) -> Result<String, Error> {
            let mut state = self
                .context
                .create_state()
                .map_err(|e| Error::WhisperError(format!("Failed to create Whisper state: {e}")))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_n_threads(WHISPER_NUM_THREADS);
            params.set_translate(false);
            params.set_language(Some("en"));
            params.set_initial_prompt(&self.config.initial_prompt);
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, samples)
                .map_err(|e| Error::WhisperError(format!("Whisper inference failed: {e}")))?;

            let mut text = String::new();
            for index in 0..state.full_n_segments() {
                let Some(segment) = state.get_segment(index) else {
                    continue;
                };
                let segment_text = segment
                    .to_str_lossy()
                    .map_err(|e| Error::WhisperError(format!("Unreadable segment: {e}")))?;
                text.push_str(&segment_text);
            }
            let text = text.trim().to_owned();
            log::debug!("Transcribed {} samples: {text:?}", samples.len());
            Ok(text)
        }
    }

    fn invalid_data(err: impl ToString) -> Error {
        Error::StdIo(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            err.to_string(),
        ))
    }

    /// Reads a WAV file as 16 kHz mono samples in -1.0..1.0.
    pub fn read_wav_file(wav_path: impl AsRef<Path>) -> Result<Vec<f32>, Error> {
        let mut reader = hound::WavReader::open(wav_path.as_ref()).map_err(invalid_data)?;
        let spec = reader.spec();
        log::debug!(
            "WAV file specs: sample_rate={}, channels={}, bits_per_sample={}",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );

        let mut samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(invalid_data)?,
            hound::SampleFormat::Int => {
                let max_int = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|sample| sample as f32 / max_int))
                    .collect::<Result<_, _>>()
                    .map_err(invalid_data)?
            }
        };

        if spec.channels == 2 {
            samples = samples
                .chunks_exact(2)
                .map(|chunk| (chunk[0] + chunk[1]) / 2.0)
                .collect();
        }
        if spec.sample_rate != SAMPLE_RATE_HZ {
            samples = resample_nearest(&samples, spec.sample_rate, SAMPLE_RATE_HZ);
        }
        Ok(samples)
    }

    fn resample_nearest(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
        let ratio = to_rate as f64 / from_rate as f64;
        let output_len = (input.len() as f64 * ratio) as usize;
        (0..output_len)
            .map(|i| {
                let src_index = (i as f64 / ratio) as usize;
                input.get(src_index).copied().unwrap_or(0.0)
            })
            .collect()
    }
}
