//! The combined audiobook waveform.

use std::path::Path;

use anyhow::Result;

use super::wav;

/// Full-request audio: the ordered concatenation of all chunk waveforms,
/// at the single sample rate shared by every chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Audiobook {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio (16000 for MMS)
    pub sample_rate: u32,
}

impl Audiobook {
    /// Concatenate per-chunk waveforms, in order, into one waveform.
    ///
    /// Chunks are appended sample-for-sample: no resampling, no cross-fade,
    /// no inserted silence. Boundary discontinuities are accepted.
    pub fn from_chunks(chunks: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let total: usize = chunks.iter().map(Vec::len).sum();
        let mut samples = Vec::with_capacity(total);
        for chunk in chunks {
            samples.extend(chunk);
        }
        Self { samples, sample_rate }
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        wav::write_wav_f32(path, self.sample_rate, &self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_preserves_order_and_count() {
        let chunks = vec![vec![0.1f32, 0.2], vec![0.3], vec![0.4, 0.5, 0.6]];
        let total: usize = chunks.iter().map(Vec::len).sum();

        let book = Audiobook::from_chunks(chunks, 16_000);
        assert_eq!(book.samples.len(), total);
        assert_eq!(book.samples, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn duration_follows_sample_rate() {
        let book = Audiobook::from_chunks(vec![vec![0.0; 32_000]], 16_000);
        assert!((book.duration_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn wav_write_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("book.wav");

        let book = Audiobook::from_chunks(vec![vec![0.5f32, -0.5], vec![0.25]], 16_000);
        book.write_wav(&path).expect("write");

        let (samples, rate) = wav::read_wav_f32(&path).expect("read");
        assert_eq!(rate, book.sample_rate);
        assert_eq!(samples, book.samples);
    }
}
