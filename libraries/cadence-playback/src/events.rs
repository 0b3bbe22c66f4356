//! Playback Events
//!
//! Notifications produced by the controller for the UI layer.
//! Events are queued at these points:
//! - Opening a new track (position reset + duration)
//! - Every progress tick (position)
//! - State transitions
//! - Failures that happen inside the progress loop

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback position changed (periodic, and reset to 0 on open/finish)
    PositionChanged {
        /// Position from the start of the stream
        position_ms: u64,
    },

    /// Duration of the newly opened track
    DurationChanged {
        /// Total stream length
        duration_ms: u64,
    },

    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Error occurred while advancing playback
    Error {
        /// Error message
        message: String,
    },
}
