//! The audiobook generation pipeline.
//!
//! One explicit request/response function: text in, combined waveform out.
//! The shell owns language resolution, model loading and persistence; this
//! module owns chunking, per-chunk synthesis and assembly. Generation is
//! all-or-nothing: a single chunk failure aborts the request and no partial
//! audio is returned.

use thiserror::Error;
use tracing::info;

use crate::audio::Audiobook;
use crate::text::chunk_text;
use crate::tts::ChunkSynthesizer;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no text to synthesize - please enter some text")]
    EmptyText,

    #[error("error processing chunk {index}/{total}: {message}")]
    ChunkSynthesis {
        /// 1-based index of the failing chunk
        index: usize,
        total: usize,
        message: String,
    },
}

/// Generate the combined audiobook waveform for `text`.
///
/// Chunks the text, synthesizes each chunk in order through `synth`, and
/// concatenates the resulting waveforms. Progress is reported as tracing
/// events, one per chunk.
pub fn generate(synth: &mut impl ChunkSynthesizer, text: &str, max_chunk_chars: usize) -> Result<Audiobook, GenerateError> {
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyText);
    }

    info!("Processing text...");
    let chunks = chunk_text(text, max_chunk_chars);
    if chunks.is_empty() {
        // Input of only separators and whitespace chunks to nothing
        return Err(GenerateError::EmptyText);
    }

    let total = chunks.len();
    let mut waveforms = Vec::with_capacity(total);

    for (i, chunk) in chunks.iter().enumerate() {
        info!("Generating audio for chunk {}/{}", i + 1, total);
        let samples = synth
            .synthesize_chunk(chunk)
            .map_err(|e| GenerateError::ChunkSynthesis { index: i + 1, total, message: format!("{e:#}") })?;
        waveforms.push(samples);
    }

    info!("Combining audio chunks...");
    Ok(Audiobook::from_chunks(waveforms, synth.sample_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    /// Stub engine: emits a fixed number of samples per chunk, tagged with
    /// the chunk index so ordering is observable; optionally fails on one
    /// chunk.
    struct StubSynthesizer {
        samples_per_chunk: usize,
        fail_on_chunk: Option<usize>, // 1-based
        calls: usize,
    }

    impl StubSynthesizer {
        fn new(samples_per_chunk: usize) -> Self {
            Self { samples_per_chunk, fail_on_chunk: None, calls: 0 }
        }

        fn failing_on(chunk: usize, samples_per_chunk: usize) -> Self {
            Self { samples_per_chunk, fail_on_chunk: Some(chunk), calls: 0 }
        }
    }

    impl ChunkSynthesizer for StubSynthesizer {
        fn synthesize_chunk(&mut self, _text: &str) -> Result<Vec<f32>> {
            self.calls += 1;
            if self.fail_on_chunk == Some(self.calls) {
                anyhow::bail!("engine rejected input");
            }
            Ok(vec![self.calls as f32; self.samples_per_chunk])
        }

        fn sample_rate(&self) -> u32 {
            16_000
        }
    }

    #[test]
    fn short_text_synthesizes_as_one_chunk() {
        let mut synth = StubSynthesizer::new(10);
        let book = generate(&mut synth, "Hello there. How are you? Fine.", 200).expect("generation succeeds");

        assert_eq!(synth.calls, 1);
        assert_eq!(book.samples.len(), 10);
        assert_eq!(book.sample_rate, 16_000);
    }

    #[test]
    fn combined_length_is_the_sum_of_chunk_lengths_in_order() {
        let mut synth = StubSynthesizer::new(4);
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let book = generate(&mut synth, text, 25).expect("generation succeeds");

        assert_eq!(synth.calls, 3);
        assert_eq!(book.samples.len(), 12);
        // Chunk tags appear in input order, back to back
        assert_eq!(book.samples, vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn empty_text_never_reaches_the_synthesizer() {
        let mut synth = StubSynthesizer::new(10);

        let err = generate(&mut synth, "   \n ", 200).expect_err("empty input is rejected");
        assert!(matches!(err, GenerateError::EmptyText));
        assert_eq!(synth.calls, 0);
    }

    #[test]
    fn chunk_failure_aborts_with_its_one_based_index() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let mut synth = StubSynthesizer::failing_on(2, 4);

        let err = generate(&mut synth, text, 25).expect_err("second chunk fails");
        match err {
            GenerateError::ChunkSynthesis { index, total, .. } => {
                assert_eq!(index, 2);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Synthesis stopped at the failing chunk; nothing was retried
        assert_eq!(synth.calls, 2);
    }

    #[test]
    fn failure_produces_no_partial_audio() {
        let mut synth = StubSynthesizer::failing_on(1, 4);
        assert!(generate(&mut synth, "Only sentence.", 200).is_err());
    }
}
