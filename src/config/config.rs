//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::languages;
use crate::text::DEFAULT_MAX_CHUNK_CHARS;

/// Hardware acceleration provider for ONNX models.
/// Auto-detected based on platform if not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// CPU inference (default fallback, always available)
    #[default]
    Cpu,
    /// NVIDIA CUDA acceleration (Linux only, requires CUDA toolkit)
    Cuda,
    /// Apple CoreML acceleration (macOS only, uses Neural Engine)
    #[value(name = "coreml")]
    CoreMl,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Cpu => write!(f, "cpu"),
            Provider::Cuda => write!(f, "cuda"),
            Provider::CoreMl => write!(f, "coreml"),
        }
    }
}

impl Provider {
    /// Convert to sherpa-rs provider string.
    pub fn as_sherpa_provider(&self) -> &'static str {
        match self {
            Provider::Cpu => "cpu",
            Provider::Cuda => "cuda",
            Provider::CoreMl => "coreml",
        }
    }
}

/// Audiobook generator configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "mms-audiobook")]
#[command(author, version, about = "Generate a spoken-word audiobook from text", long_about = None)]
pub struct AppConfig {
    /// List all supported languages and exit
    #[arg(long)]
    pub list_languages: bool,

    /// Show detailed information about a specific language and exit
    #[arg(long)]
    pub language_info: Option<String>,

    /// Language to synthesize: a name (e.g. "Tamil") or ISO-639-3 code (e.g. "tam")
    #[arg(long, short = 'l', default_value = "English")]
    pub language: String,

    /// Text to convert to audio
    #[arg(long, short = 't', conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the text from a file instead of --text (stdin is used when neither is given)
    #[arg(long, conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// Output WAV file for the generated audiobook
    #[arg(long, short = 'o', default_value = "audiobook.wav")]
    pub output: PathBuf,

    /// Maximum characters per synthesis chunk (soft bound; a single longer
    /// sentence passes through unsplit)
    #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_CHARS)]
    pub max_chunk_chars: usize,

    /// Directory containing MMS model files
    #[arg(long, short = 'd', env = "MODEL_DIR", default_value_os_t = default_model_dir())]
    pub model_dir: PathBuf,

    /// Download the model for the selected language if it is not present
    #[arg(long)]
    pub download: bool,

    /// Text-to-speech speed multiplier
    #[arg(long, default_value = "1.0")]
    pub tts_speed: f32,

    /// Hardware acceleration provider (auto-detected if not specified)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Number of threads for model inference (0 = auto-detect based on CPU cores)
    #[arg(long, default_value = "0")]
    pub num_threads: usize,

    /// TTS threads (0 = use num_threads)
    #[arg(long, default_value = "0")]
    pub tts_threads: usize,

    /// Skip playback of the generated audiobook
    #[arg(long)]
    pub no_play: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        let mut config = Self::parse();

        // Handle language listing commands
        if config.list_languages {
            languages::print_languages();
            std::process::exit(0);
        }

        if let Some(ref selector) = config.language_info {
            match languages::print_language_info(selector) {
                Ok(_) => std::process::exit(0),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        config.normalize_thread_counts();
        config
    }

    /// Auto-detect and normalize thread counts based on CPU cores and provider.
    ///
    /// When using CUDA, 1 thread is used because the GPU handles parallelism
    /// internally; more CPU threads only cause contention.
    fn normalize_thread_counts(&mut self) {
        let cpu_cores = num_cpus::get();
        let provider = self.effective_provider();

        if self.num_threads == 0 {
            self.num_threads = if provider == Provider::Cuda {
                1
            } else {
                // cores/3 leaves headroom and prevents oversubscription
                (cpu_cores / 3).max(1)
            };
        }

        if self.tts_threads == 0 {
            self.tts_threads = if provider == Provider::Cuda { 1 } else { self.num_threads };
        }

        if self.verbose {
            info!("CPU cores: {}, Provider: {}, TTS threads: {}", cpu_cores, provider, self.tts_threads);
        }
    }

    /// Get the effective acceleration provider.
    pub fn effective_provider(&self) -> Provider {
        self.provider.unwrap_or_else(detect_provider)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tts_speed <= 0.0 {
            anyhow::bail!("TTS speed must be positive");
        }

        if self.max_chunk_chars == 0 {
            anyhow::bail!("--max-chunk-chars must be at least 1");
        }

        if let Some(ref path) = self.text_file
            && !path.exists()
        {
            anyhow::bail!("Text file does not exist: {}", path.display());
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Model directory: {}", self.model_dir.display());
        info!("  Language: {}", self.language);
        info!("  Output file: {}", self.output.display());
        info!("  Max chunk chars: {}", self.max_chunk_chars);
        info!("  TTS speed: {}", self.tts_speed);
        info!("  Provider: {}", self.effective_provider());
        info!("  TTS threads: {}", self.tts_threads);
    }
}

/// Get the default model directory (~/.mms-audiobook/models).
fn default_model_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".mms-audiobook").join("models")
    } else {
        PathBuf::from("models")
    }
}

/// Auto-detect the best hardware acceleration provider.
fn detect_provider() -> Provider {
    #[cfg(target_os = "macos")]
    {
        info!("Detected macOS, using CoreML provider");
        Provider::CoreMl
    }

    #[cfg(target_os = "linux")]
    {
        if has_nvidia_gpu() {
            info!("Detected NVIDIA GPU, using CUDA provider");
            Provider::Cuda
        } else {
            info!("No GPU detected, using CPU provider");
            Provider::Cpu
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        info!("Using CPU provider");
        Provider::Cpu
    }
}

/// Check if an NVIDIA GPU is available (Linux only).
#[cfg(target_os = "linux")]
fn has_nvidia_gpu() -> bool {
    use std::path::Path;

    // Check for NVIDIA device files
    let nvidia_paths = [
        "/dev/nvidia0",
        "/dev/nvidiactl",
        "/dev/nvidia-uvm",
        // Jetson devices
        "/dev/nvhost-ctrl",
        "/dev/nvhost-ctrl-gpu",
    ];

    for path in &nvidia_paths {
        if Path::new(path).exists() {
            return true;
        }
    }

    // Check for Tegra (Jetson) devices
    if Path::new("/etc/nv_tegra_release").exists() {
        return true;
    }

    false
}
