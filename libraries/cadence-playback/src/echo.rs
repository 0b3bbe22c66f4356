//! Spatial echo modulation
//!
//! The "3D" effect is a stereo echo whose per-channel source volumes follow a phase
//! that advances on every progress tick: the left channel tracks `cos(phase)` and the
//! right channel tracks `sin(phase / 2)`, which makes the sound drift around the
//! listener.

use crate::types::EffectToggle;
use serde::{Deserialize, Serialize};

/// Left channel echo delay in milliseconds
pub const LEFT_DELAY_MS: i32 = 1000;

/// Right channel echo delay in milliseconds
pub const RIGHT_DELAY_MS: i32 = 500;

/// Echo volume for both channels (0-100)
pub const ECHO_VOLUME: i32 = 20;

/// Stereo echo parameters handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EchoParams {
    pub left_delay_ms: i32,
    pub left_echo_volume: i32,
    pub left_source_volume: i32,
    pub right_delay_ms: i32,
    pub right_echo_volume: i32,
    pub right_source_volume: i32,
}

impl EchoParams {
    /// Parameters for a given phase
    ///
    /// Source volumes are truncated toward zero and may be negative.
    pub fn at_phase(phase: f32) -> Self {
        Self {
            left_delay_ms: LEFT_DELAY_MS,
            left_echo_volume: ECHO_VOLUME,
            left_source_volume: (100.0 * phase.cos()) as i32,
            right_delay_ms: RIGHT_DELAY_MS,
            right_echo_volume: ECHO_VOLUME,
            right_source_volume: (100.0 * (phase * 0.5).sin()) as i32,
        }
    }
}

/// Spatial echo state: on/off flag plus the advancing phase
#[derive(Debug, Clone)]
pub struct SpatialEcho {
    enabled: bool,
    phase: f32,
    step: f32,
}

impl SpatialEcho {
    pub fn new(step: f32) -> Self {
        Self {
            enabled: false,
            phase: 0.0,
            step,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current phase in radians
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Flip the flag, reporting both the old and new value
    pub fn toggle(&mut self) -> EffectToggle {
        let previous = self.enabled;
        self.enabled = !previous;
        EffectToggle {
            previous,
            enabled: self.enabled,
        }
    }

    /// Advance one tick and return the parameters for the new phase
    ///
    /// Returns `None` while disabled; the phase only moves while enabled.
    pub fn advance(&mut self) -> Option<EchoParams> {
        if !self.enabled {
            return None;
        }
        self.phase += self.step;
        Some(EchoParams::at_phase(self.phase))
    }
}

impl Default for SpatialEcho {
    fn default() -> Self {
        Self::new(0.5)
    }
}
