//! Text-to-speech module using sherpa-rs.
//!
//! Provides speech synthesis with MMS VITS models and the registry that
//! resolves (and downloads) the per-language model artifacts.

pub mod registry;
mod synthesizer;

pub use registry::{ModelRegistry, RegistryError, VitsModel};
pub use synthesizer::{ChunkSynthesizer, Synthesizer};
