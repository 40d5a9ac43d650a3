//! Text processing for audiobook generation.
//!
//! Splits raw input text into bounded-length chunks suitable for one TTS
//! synthesis call each.

mod chunker;

pub use chunker::{DEFAULT_MAX_CHUNK_CHARS, chunk_text};
