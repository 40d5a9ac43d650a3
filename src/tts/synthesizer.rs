//! Text-to-speech synthesizer using MMS VITS models.

use anyhow::Result;
use sherpa_rs::OnnxConfig;
use sherpa_rs::tts::{CommonTtsConfig, VitsTts, VitsTtsConfig};
use tracing::{debug, info};

use super::registry::VitsModel;
use crate::config::AppConfig;

/// Sample rate of the MMS VITS model family (fixed at export time).
const MMS_SAMPLE_RATE: u32 = 16_000;

/// One text chunk in, one waveform out.
///
/// The seam between the generation pipeline and the TTS engine; the pipeline
/// is generic over it so it can be driven by a stub in tests.
pub trait ChunkSynthesizer {
    /// Synthesize one chunk of text into audio samples.
    fn synthesize_chunk(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Sample rate of every waveform this synthesizer produces.
    fn sample_rate(&self) -> u32;
}

/// Text-to-speech synthesizer wrapping a single-language MMS VITS model.
pub struct Synthesizer {
    tts: VitsTts,     // VITS TTS engine
    sample_rate: u32, // Output sample rate (16kHz for MMS)
    speed: f32,       // Speech speed multiplier
}

impl Synthesizer {
    /// Create a new TTS synthesizer for the resolved model.
    ///
    /// # Errors
    /// Returns an error if TTS initialization fails (e.g., unreadable model files).
    pub fn new(config: &AppConfig, model: &VitsModel) -> Result<Self> {
        let provider = config.effective_provider();

        info!("Initializing MMS TTS synthesizer with {} provider", provider);
        info!("TTS model: {} ({})", model.code, model.model.display());

        let tts_config = VitsTtsConfig {
            model: model.model.to_string_lossy().to_string(),
            tokens: model.tokens.to_string_lossy().to_string(),
            noise_scale: 0.667,
            noise_scale_w: 0.8,
            length_scale: 1.0 / config.tts_speed, // length_scale is inverse of speed
            onnx_config: OnnxConfig {
                provider: provider.as_sherpa_provider().to_string(),
                num_threads: config.tts_threads.try_into().unwrap_or(2),
                debug: config.verbose,
            },
            common_config: CommonTtsConfig { max_num_sentences: 1, ..Default::default() },
            // lexicon, data_dir and dict_dir stay empty: MMS models carry
            // their character set in tokens.txt
            ..Default::default()
        };

        let tts = VitsTts::new(tts_config);

        // MMS VITS models are exported at 16000 Hz
        let sample_rate = MMS_SAMPLE_RATE;
        info!("TTS sample rate: {} Hz", sample_rate);

        Ok(Self { tts, sample_rate, speed: config.tts_speed })
    }
}

impl ChunkSynthesizer for Synthesizer {
    /// Synthesize a single text chunk.
    ///
    /// # Errors
    /// Returns an error if TTS generation fails, or if the engine reports a
    /// sample rate other than the configured one (all chunks of a request
    /// must share one rate for sample-for-sample concatenation).
    fn synthesize_chunk(&mut self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        debug!("Synthesizing chunk: \"{}\"", text);

        // MMS models are single-speaker, speaker id 0
        let audio = self.tts.create(text, 0, self.speed).map_err(|e| anyhow::anyhow!("TTS generation failed: {}", e))?;

        if audio.sample_rate != self.sample_rate {
            anyhow::bail!("model produced {} Hz audio, expected {} Hz", audio.sample_rate, self.sample_rate);
        }

        debug!("Generated speech ({} samples)", audio.samples.len());
        Ok(audio.samples)
    }

    /// Get the sample rate of the synthesized audio.
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
