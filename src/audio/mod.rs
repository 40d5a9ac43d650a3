//! Audio module: waveform assembly, WAV I/O and device playback.
//!
//! Playback uses cpal for cross-platform output, with high-quality
//! resampling support via rubato.

mod book;
mod playback;
pub mod resampler;
pub mod util;
pub mod wav;

pub use book::Audiobook;
pub use playback::Player;
