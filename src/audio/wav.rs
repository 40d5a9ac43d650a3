//! WAV file helpers.
//!
//! The combined waveform is stored as mono 32-bit float WAV: the model's f32
//! output written as-is, with no re-quantization.

use std::path::Path;

use anyhow::{Context, Result};

/// Write mono f32 samples as a 32-bit float WAV file.
pub fn write_wav_f32(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec).with_context(|| format!("failed creating wav file {}", path.display()))?;

    for sample in samples {
        writer.write_sample(*sample)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Read a mono WAV file back into f32 samples.
///
/// Accepts both float and 16-bit integer encodings so externally produced
/// files play too.
pub fn read_wav_f32(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path).with_context(|| format!("failed opening wav file {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => reader.samples::<i16>().map(|s| s.map(|v| v as f32 / i16::MAX as f32)).collect::<Result<_, _>>()?,
    };

    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_wav_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.wav");

        let samples = vec![0.0f32, 0.25, -0.5, 1.0];
        write_wav_f32(&path, 16_000, &samples).expect("write");

        let (read_back, rate) = read_wav_f32(&path).expect("read");
        assert_eq!(rate, 16_000);
        assert_eq!(read_back, samples);
    }
}
