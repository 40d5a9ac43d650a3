//! Configuration module for the audiobook generator.
//!
//! Provides CLI argument parsing and the supported-language table.

#[allow(clippy::module_inception)]
mod config;
pub mod languages;

pub use config::{AppConfig, Provider};
