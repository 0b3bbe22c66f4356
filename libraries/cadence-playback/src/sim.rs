//! Simulated audio engine
//!
//! A stand-in backend that decodes nothing. Streams have a length and a position that
//! moves with a clock, which is either the wall clock or a manual one advanced by the
//! caller. Everything the controller sets (volume, echo, EQ, DSP flags) is recorded so
//! it can be inspected.

use crate::echo::EchoParams;
use crate::engine::AudioEngine;
use crate::error::EngineError;
use crate::types::EngineStatus;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Error code for a stream that could not be opened
pub const ERR_OPEN: i32 = 1;
/// Error code for `play()` without an open stream
pub const ERR_NO_STREAM: i32 = 2;
/// Error code for an injected output failure
pub const ERR_OUTPUT: i32 = 3;

/// Time source for stream positions
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Real time since the engine was created
    Wall(Instant),

    /// Time advanced explicitly via [`SimulatedEngine::advance`]
    Manual(Duration),
}

impl Clock {
    fn now(&self) -> Duration {
        match self {
            Clock::Wall(origin) => origin.elapsed(),
            Clock::Manual(elapsed) => *elapsed,
        }
    }
}

/// DSP state set through the engine primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DspState {
    pub rate: u32,
    pub pitch: u32,
    pub tempo: u32,
    pub channel_mix: bool,
    pub reverse: bool,
    pub side_cut: bool,
    pub center_cut: bool,
}

impl Default for DspState {
    fn default() -> Self {
        Self {
            rate: 100,
            pitch: 100,
            tempo: 100,
            channel_mix: false,
            reverse: false,
            side_cut: false,
            center_cut: false,
        }
    }
}

/// Clock-driven engine with no real audio output
#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    clock: Clock,

    // Library
    tracks: HashMap<String, Duration>,
    default_length: Duration,
    unreadable: HashSet<String>,
    fail_play: bool,

    // Stream
    media: Option<String>,
    length: Duration,
    /// Position when the stream was last started, paused or seeked
    base: Duration,
    /// Clock time at which the stream started running, `None` while not running
    anchor: Option<Duration>,
    paused: bool,

    // Recorded settings
    volume: (u8, u8),
    echo_enabled: bool,
    echo_history: Vec<EchoParams>,
    eq_enabled: bool,
    eq_gains: Vec<i32>,
    dsp: DspState,
    last_slide: Option<(u8, u8, Duration)>,
    last_error: EngineError,

    opens: usize,
    closes: usize,
}

impl SimulatedEngine {
    /// Engine on a manual clock, with 3 minute default tracks
    pub fn new() -> Self {
        Self::with_clock(Clock::Manual(Duration::ZERO))
    }

    /// Engine whose streams advance in real time
    pub fn with_wall_clock() -> Self {
        Self::with_clock(Clock::Wall(Instant::now()))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            tracks: HashMap::new(),
            default_length: Duration::from_secs(180),
            unreadable: HashSet::new(),
            fail_play: false,
            media: None,
            length: Duration::ZERO,
            base: Duration::ZERO,
            anchor: None,
            paused: false,
            volume: (100, 100),
            echo_enabled: false,
            echo_history: Vec::new(),
            eq_enabled: false,
            eq_gains: Vec::new(),
            dsp: DspState::default(),
            last_slide: None,
            last_error: EngineError::default(),
            opens: 0,
            closes: 0,
        }
    }

    /// Register a track length for an identifier
    pub fn with_track(mut self, media: impl Into<String>, length: Duration) -> Self {
        self.tracks.insert(media.into(), length);
        self
    }

    /// Length used for identifiers that were not registered
    pub fn with_default_length(mut self, length: Duration) -> Self {
        self.default_length = length;
        self
    }

    /// Make `open` fail for this identifier
    pub fn mark_unreadable(&mut self, media: impl Into<String>) {
        self.unreadable.insert(media.into());
    }

    /// Make every `play` call fail until cleared
    pub fn set_play_failure(&mut self, fail: bool) {
        self.fail_play = fail;
    }

    /// Move the manual clock forward; ignored on the wall clock
    pub fn advance(&mut self, elapsed: Duration) {
        match &mut self.clock {
            Clock::Manual(now) => *now += elapsed,
            Clock::Wall(_) => tracing::debug!("advance() ignored on wall clock"),
        }
    }

    /// Jump to the end of the open stream, as if it had played out
    pub fn finish_stream(&mut self) {
        if self.media.is_some() {
            self.base = self.length;
            self.paused = false;
            if self.anchor.is_some() {
                self.anchor = Some(self.clock.now());
            }
        }
    }

    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    pub fn open_count(&self) -> usize {
        self.opens
    }

    pub fn close_count(&self) -> usize {
        self.closes
    }

    pub fn echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    /// Every echo parameter set applied, oldest first
    pub fn echo_history(&self) -> &[EchoParams] {
        &self.echo_history
    }

    pub fn eq_enabled(&self) -> bool {
        self.eq_enabled
    }

    pub fn eq_band_gains(&self) -> &[i32] {
        &self.eq_gains
    }

    pub fn dsp(&self) -> DspState {
        self.dsp
    }

    /// Most recent volume slide as (from, to, duration)
    pub fn last_slide(&self) -> Option<(u8, u8, Duration)> {
        self.last_slide
    }

    fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    fn fail(&mut self, code: i32, message: String) -> bool {
        tracing::debug!("Simulated engine error {}: {}", code, message);
        self.last_error = EngineError::new(code, message);
        false
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine for SimulatedEngine {
    fn open(&mut self, media: &str) -> bool {
        if self.unreadable.contains(media) {
            return self.fail(ERR_OPEN, format!("cannot open file: {media}"));
        }

        self.media = Some(media.to_string());
        self.length = self
            .tracks
            .get(media)
            .copied()
            .unwrap_or(self.default_length);
        self.base = Duration::ZERO;
        self.anchor = None;
        self.paused = false;
        self.opens += 1;
        true
    }

    fn close(&mut self) {
        if self.media.take().is_some() {
            self.closes += 1;
        }
        self.length = Duration::ZERO;
        self.base = Duration::ZERO;
        self.anchor = None;
        self.paused = false;
    }

    fn play(&mut self) -> bool {
        if self.media.is_none() {
            return self.fail(ERR_NO_STREAM, "no stream open".to_string());
        }
        if self.fail_play {
            return self.fail(ERR_OUTPUT, "output device unavailable".to_string());
        }

        let position = self.position();
        self.base = if position >= self.length {
            Duration::ZERO
        } else {
            position
        };
        self.anchor = Some(self.clock.now());
        self.paused = false;
        true
    }

    fn pause(&mut self) {
        if self.is_running() {
            self.base = self.position();
            self.anchor = None;
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        if self.paused {
            self.anchor = Some(self.clock.now());
            self.paused = false;
        }
    }

    fn stop(&mut self) {
        self.base = Duration::ZERO;
        self.anchor = None;
        self.paused = false;
    }

    fn seek(&mut self, position: Duration) {
        if self.media.is_none() {
            return;
        }
        self.base = position.min(self.length);
        if self.is_running() {
            self.anchor = Some(self.clock.now());
        }
    }

    fn status(&self) -> EngineStatus {
        EngineStatus {
            playing: self.is_running() && self.position() < self.length,
            paused: self.paused,
        }
    }

    fn position(&self) -> Duration {
        match self.anchor {
            Some(anchor) => {
                let elapsed = self.clock.now().saturating_sub(anchor);
                (self.base + elapsed).min(self.length)
            }
            None => self.base,
        }
    }

    fn duration(&self) -> Duration {
        self.length
    }

    fn set_volume(&mut self, left: u8, right: u8) {
        self.volume = (left.min(100), right.min(100));
    }

    fn volume(&self) -> (u8, u8) {
        self.volume
    }

    fn set_echo_enabled(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    fn set_echo_params(&mut self, params: &EchoParams) {
        self.echo_history.push(*params);
    }

    fn last_error(&self) -> EngineError {
        self.last_error.clone()
    }

    fn set_eq_enabled(&mut self, enabled: bool) {
        self.eq_enabled = enabled;
    }

    fn set_eq_band_gains(&mut self, gains: &[i32]) {
        self.eq_gains = gains.to_vec();
    }

    fn set_rate(&mut self, percent: u32) {
        self.dsp.rate = percent;
    }

    fn rate(&self) -> u32 {
        self.dsp.rate
    }

    fn set_pitch(&mut self, percent: u32) {
        self.dsp.pitch = percent;
    }

    fn pitch(&self) -> u32 {
        self.dsp.pitch
    }

    fn set_tempo(&mut self, percent: u32) {
        self.dsp.tempo = percent;
    }

    fn tempo(&self) -> u32 {
        self.dsp.tempo
    }

    fn set_channel_mix(&mut self, enabled: bool) {
        self.dsp.channel_mix = enabled;
    }

    fn set_reverse(&mut self, enabled: bool) {
        self.dsp.reverse = enabled;
    }

    fn set_side_cut(&mut self, enabled: bool) {
        self.dsp.side_cut = enabled;
    }

    fn set_center_cut(&mut self, enabled: bool) {
        self.dsp.center_cut = enabled;
    }

    fn slide_volume(&mut self, from: u8, to: u8, over: Duration) {
        self.last_slide = Some((from, to, over));
        self.volume = (to, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SimulatedEngine {
        SimulatedEngine::new().with_track("/music/a.mp3", Duration::from_secs(10))
    }

    #[test]
    fn position_follows_manual_clock() {
        let mut engine = engine();
        assert!(engine.open("/music/a.mp3"));
        assert_eq!(engine.duration(), Duration::from_secs(10));
        assert!(engine.play());

        engine.advance(Duration::from_secs(3));
        assert_eq!(engine.position(), Duration::from_secs(3));
        assert!(engine.status().playing);
    }

    #[test]
    fn pause_freezes_position() {
        let mut engine = engine();
        engine.open("/music/a.mp3");
        engine.play();
        engine.advance(Duration::from_secs(2));
        engine.pause();
        engine.advance(Duration::from_secs(5));

        assert_eq!(engine.position(), Duration::from_secs(2));
        assert_eq!(
            engine.status(),
            EngineStatus {
                playing: false,
                paused: true
            }
        );

        engine.resume();
        engine.advance(Duration::from_secs(1));
        assert_eq!(engine.position(), Duration::from_secs(3));
    }

    #[test]
    fn stream_end_goes_idle() {
        let mut engine = engine();
        engine.open("/music/a.mp3");
        engine.play();
        engine.advance(Duration::from_secs(11));

        assert_eq!(engine.position(), Duration::from_secs(10));
        assert!(engine.status().is_idle());
    }

    #[test]
    fn finish_stream_jumps_to_end() {
        let mut engine = engine();
        engine.open("/music/a.mp3");
        engine.play();
        engine.finish_stream();
        assert!(engine.status().is_idle());
    }

    #[test]
    fn unreadable_media_fails_to_open() {
        let mut engine = engine();
        engine.mark_unreadable("/music/broken.mp3");

        assert!(!engine.open("/music/broken.mp3"));
        assert_eq!(engine.last_error().code, ERR_OPEN);
        assert_eq!(engine.open_count(), 0);
    }

    #[test]
    fn play_requires_open_stream() {
        let mut engine = engine();
        assert!(!engine.play());
        assert_eq!(engine.last_error().code, ERR_NO_STREAM);
    }

    #[test]
    fn seek_is_clamped_to_length() {
        let mut engine = engine();
        engine.open("/music/a.mp3");
        engine.seek(Duration::from_secs(60));
        assert_eq!(engine.position(), Duration::from_secs(10));
    }

    #[test]
    fn close_counts_only_open_streams() {
        let mut engine = engine();
        engine.close();
        assert_eq!(engine.close_count(), 0);

        engine.open("/music/a.mp3");
        engine.close();
        assert_eq!(engine.close_count(), 1);
        assert_eq!(engine.media(), None);
    }
}
