//! Error types for playback control

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic record reported by the audio engine
///
/// Engines report failures through a code/message pair rather than a typed error,
/// so the controller carries both verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineError {
    /// Engine-specific error code
    pub code: i32,

    /// Human-readable message
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The engine refused to open the media resource
    #[error("Engine failed to open media: {0}")]
    EngineOpenFailed(EngineError),

    /// The engine opened the resource but refused to start playing it
    #[error("Engine failed to start playback: {0}")]
    EngineStartFailed(EngineError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
