//! Cadence CLI Library
//!
//! Configuration loading and command parsing for the `cadence` terminal player.
//!
//! This library exposes the front-end pieces for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::{parse_line, Input, HELP};
pub use config::{CadenceConfig, PlaylistSettings, SimulationSettings};
pub use error::{CliError, Result};
