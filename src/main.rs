//! MMS Audiobook Generator - turn text into a spoken-word WAV file.
//!
//! One invocation performs one blocking request: resolve the selected
//! language against the static table, load the MMS VITS model for it, chunk
//! the text on sentence boundaries, synthesize each chunk in order,
//! concatenate the waveforms, write the result to the output file and play it
//! back through the default output device.

mod audio;
mod config;
mod pipeline;
mod text;
mod tts;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use audio::Player;
use config::AppConfig;
use config::languages;
use tts::{ModelRegistry, Synthesizer};

fn main() {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Initialize logging with time-only format.
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("📖 MMS Audiobook Generator v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    // All errors surface here as log messages, never as panics
    if let Err(e) = run(&config) {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// One full audiobook request: model load, generation, persistence, playback.
fn run(config: &AppConfig) -> Result<()> {
    let language = languages::resolve(&config.language)
        .ok_or_else(|| anyhow::anyhow!("Unknown language '{}'. Run with --list-languages to see supported languages", config.language))?;

    let input = read_text_input(config)?;
    if input.trim().is_empty() {
        // User input error, not a failure: report and stop before the
        // pipeline ever runs
        warn!("Please enter some text.");
        return Ok(());
    }

    config.log_config();

    info!("Loading model...");
    let registry = ModelRegistry::new(&config.model_dir);
    let model = if config.download {
        registry.fetch(language.code, false)?
    } else {
        registry.resolve(language.code)?
    };
    let mut synthesizer = Synthesizer::new(config, &model)?;

    let book = pipeline::generate(&mut synthesizer, &input, config.max_chunk_chars)?;
    info!("Generated {:.1}s of audio ({} samples)", book.duration_secs(), book.samples.len());

    // The combined waveform goes to a scoped temporary file first; the
    // output copy and playback both read from it, and it is removed on
    // every exit path (including errors below) when the handle drops
    info!("Preparing download...");
    let temp_wav = tempfile::Builder::new()
        .prefix("mms-audiobook-")
        .suffix(".wav")
        .tempfile()
        .context("failed creating temporary wav file")?;
    book.write_wav(temp_wav.path())?;

    std::fs::copy(temp_wav.path(), &config.output).with_context(|| format!("failed writing output file {}", config.output.display()))?;
    info!("💾 Saved audiobook to {}", config.output.display());

    let playback = if config.no_play { Ok(()) } else { play_audiobook(temp_wav.path()) };

    info!("Cleaning up temporary files...");
    temp_wav.close().context("failed removing temporary wav file")?;

    playback?;

    info!("Done!");
    Ok(())
}

/// Get the input text from --text, --text-file, or stdin.
fn read_text_input(config: &AppConfig) -> Result<String> {
    if let Some(ref text) = config.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = config.text_file {
        return std::fs::read_to_string(path).with_context(|| format!("failed reading text file {}", path.display()));
    }

    info!("Reading text from stdin...");
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).context("failed reading text from stdin")?;
    Ok(buf)
}

/// Play the generated WAV through the default output device.
fn play_audiobook(path: &Path) -> Result<()> {
    let (samples, sample_rate) = audio::wav::read_wav_f32(path)?;
    let player = Player::new(sample_rate)?;
    player.play(&samples)
}
