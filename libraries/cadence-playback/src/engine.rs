//! Audio engine adapter trait
//!
//! Abstracts the decode/render backend the controller drives. The controller never
//! decodes anything itself; it issues imperative calls and polls status.

use crate::echo::EchoParams;
use crate::error::EngineError;
use crate::types::EngineStatus;
use std::time::Duration;

/// Decode/render backend driven by the playback controller
///
/// All calls are synchronous. Fallible calls report failure through their return
/// value, with details available from [`AudioEngine::last_error`].
pub trait AudioEngine {
    /// Open a media resource for playback
    ///
    /// # Returns
    /// * `true` - Stream opened and positioned at the start
    /// * `false` - Open failed, see `last_error()`
    fn open(&mut self, media: &str) -> bool;

    /// Close the current stream and release decode resources
    ///
    /// Closing with nothing open is a no-op.
    fn close(&mut self);

    /// Start playback of the open stream
    fn play(&mut self) -> bool;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Resume a paused stream in place
    fn resume(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Seek to an absolute offset from the beginning of the stream
    fn seek(&mut self, position: Duration);

    /// Current playing/paused flags
    fn status(&self) -> EngineStatus;

    /// Current playback position
    fn position(&self) -> Duration;

    /// Total length of the open stream
    fn duration(&self) -> Duration;

    /// Set master volume per channel (0-100)
    fn set_volume(&mut self, left: u8, right: u8);

    /// Master volume per channel (0-100)
    fn volume(&self) -> (u8, u8);

    /// Enable or disable the echo subsystem
    fn set_echo_enabled(&mut self, enabled: bool);

    /// Replace the echo parameters
    fn set_echo_params(&mut self, params: &EchoParams);

    /// Diagnostic for the most recent failed call
    fn last_error(&self) -> EngineError;

    // ===== DSP primitives used by equalizers =====

    /// Enable or disable the band equalizer
    fn set_eq_enabled(&mut self, enabled: bool);

    /// Set per-band gains in dB
    fn set_eq_band_gains(&mut self, gains: &[i32]);

    /// Playback rate in percent (100 = normal)
    fn set_rate(&mut self, percent: u32);

    fn rate(&self) -> u32;

    /// Pitch in percent (100 = normal)
    fn set_pitch(&mut self, percent: u32);

    fn pitch(&self) -> u32;

    /// Tempo in percent (100 = normal)
    fn set_tempo(&mut self, percent: u32);

    fn tempo(&self) -> u32;

    /// Mix left and right into both channels
    fn set_channel_mix(&mut self, enabled: bool);

    /// Play the stream backwards
    fn set_reverse(&mut self, enabled: bool);

    /// Remove side (L-R) content
    fn set_side_cut(&mut self, enabled: bool);

    /// Remove center (L+R) content
    fn set_center_cut(&mut self, enabled: bool);

    /// Ramp master volume from `from` to `to` over `over`
    fn slide_volume(&mut self, from: u8, to: u8, over: Duration);
}
