//! Audio resampling utilities using rubato FFT-based resampler.
//!
//! The MMS models emit 16 kHz audio; most output devices run at 44.1 or
//! 48 kHz, so the finished waveform is resampled once before playback.

use anyhow::{Context, Result};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Chunk size for FFT-based resampling (provides good quality and performance).
const CHUNK_SIZE: usize = 1024;

/// Number of sub-chunks for FFT processing (higher = better quality but more CPU).
const SUB_CHUNKS: usize = 2;

/// Resample audio from one sample rate to another (batch processing).
///
/// Processes the entire buffer at once; suitable for preparing the combined
/// audiobook waveform for the output device. Uses FFT-based resampling for
/// high quality with minimal artifacts.
///
/// # Arguments
/// * `samples` - Input audio samples
/// * `from_rate` - Input sample rate (e.g., 16000 for MMS)
/// * `to_rate` - Output sample rate (e.g., 48000 for audio device)
///
/// # Returns
/// Resampled audio samples at the target rate
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    // No resampling needed if rates match
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    // Create the FFT-based synchronous resampler
    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1, // mono
        FixedSync::Input,
    )
    .context("Failed to create resampler")?;

    // Calculate output buffer size
    let output_frames_max = resampler.output_frames_max();
    let mut output_buffer = vec![0.0f32; output_frames_max];

    // Pre-allocate output vector with estimated size
    let estimated_output_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize + CHUNK_SIZE;
    let mut output = Vec::with_capacity(estimated_output_len);

    let mut pos = 0;

    // Process in chunks
    while pos < samples.len() {
        let end = (pos + CHUNK_SIZE).min(samples.len());
        let chunk = &samples[pos..end];

        // Pad the last chunk if needed
        let input_chunk: Vec<f32> = if chunk.len() < CHUNK_SIZE {
            let mut padded = chunk.to_vec();
            padded.resize(CHUNK_SIZE, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        // Create adapters for rubato
        let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).context("Failed to create input adapter")?;
        let mut output_adapter = InterleavedSlice::new_mut(&mut output_buffer, 1, output_frames_max).context("Failed to create output adapter")?;

        match resampler.process_into_buffer(&input_adapter, &mut output_adapter, None) {
            Ok((_, frames_written)) => {
                output.extend_from_slice(&output_buffer[..frames_written]);
            }
            Err(e) => {
                return Err(anyhow::anyhow!("Resampling error: {}", e));
            }
        }

        pos += CHUNK_SIZE;
    }

    // Trim any excess padding from the end
    let expected_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize;
    output.truncate(expected_len + 100); // Keep a small buffer for safety

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_upsampling() {
        // Upsample from 16kHz to 48kHz (3x)
        let samples = vec![0.0; 16000]; // 1 second at 16kHz
        let result = resample(&samples, 16000, 48000).unwrap();
        // Should be approximately 3x longer (within margin for padding)
        assert!(result.len() >= 48000 && result.len() <= 48100);
    }

    #[test]
    fn test_resample_identity_when_rates_match() {
        let samples = vec![0.25; 1000];
        let result = resample(&samples, 16000, 16000).unwrap();
        assert_eq!(result, samples);
    }
}
