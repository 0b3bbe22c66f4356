//! Playback controller - core orchestration
//!
//! Drives the audio engine through a small state machine, polls progress on a fixed
//! period, and decides what happens when a track runs out.

use crate::{
    echo::SpatialEcho,
    engine::AudioEngine,
    equalizer::{Equalizer, PresetEqualizer},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    playlist::Playlist,
    timer::ProgressTimer,
    types::{
        ControllerConfig, EffectToggle, EngineStatus, PlaybackState, RepeatPolicy, SpecialEffect,
    },
};
use std::time::{Duration, Instant};

/// What the progress loop should do after a status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    /// Stream still playing or paused
    KeepPolling,

    /// Stop the engine and report the end of playback
    Finish,

    /// Start the entry the playlist advanced to
    PlayNext(usize),
}

/// Decide how to react to a status poll
///
/// `advance` is only invoked when the stream has ended and the policy allows moving
/// on, so a playlist is never advanced under `PlayOnce`.
pub fn completion_action(
    status: EngineStatus,
    policy: RepeatPolicy,
    advance: impl FnOnce() -> Option<usize>,
) -> CompletionAction {
    if !status.is_idle() {
        return CompletionAction::KeepPolling;
    }
    if policy == RepeatPolicy::PlayOnce {
        return CompletionAction::Finish;
    }
    match advance() {
        Some(index) => CompletionAction::PlayNext(index),
        None => CompletionAction::Finish,
    }
}

fn as_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Central playback control
///
/// Owns the engine and equalizer for its whole lifetime; the playlist is assigned
/// separately and can be swapped. All calls are expected from a single thread (see
/// [`PlayerLoop`](crate::PlayerLoop)).
pub struct PlaybackController<E: AudioEngine> {
    // State
    state: PlaybackState,
    media: Option<String>,

    // Settings
    volume: u8,
    volume_preference: Option<u8>,
    echo: SpatialEcho,
    timer: ProgressTimer,

    // Collaborators
    engine: E,
    equalizer: Box<dyn Equalizer>,
    playlist: Option<Box<dyn Playlist>>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<E: AudioEngine> PlaybackController<E> {
    /// Create a controller with the built-in preset equalizer
    pub fn new(engine: E, config: &ControllerConfig) -> Self {
        Self::with_equalizer(engine, Box::new(PresetEqualizer::default()), config)
    }

    pub fn with_equalizer(
        engine: E,
        equalizer: Box<dyn Equalizer>,
        config: &ControllerConfig,
    ) -> Self {
        Self {
            state: PlaybackState::Stopped,
            media: None,
            volume: config.initial_volume.min(100),
            volume_preference: config.volume_preference.map(|level| level.min(100)),
            echo: SpatialEcho::new(config.echo_phase_step),
            timer: ProgressTimer::new(config.tick_interval()),
            engine,
            equalizer,
            playlist: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Play the playlist's current entry
    ///
    /// Resumes in place when that entry is already loaded and paused; otherwise the
    /// engine is closed and the entry opened from the start. Does nothing without a
    /// playlist, with an empty one, or with no entry selected.
    ///
    /// If the entry cannot be opened or started the controller ends up `Stopped`.
    pub fn play(&mut self) -> Result<()> {
        let Some(playlist) = self.playlist.as_deref() else {
            tracing::debug!("play() ignored: no playlist assigned");
            return Ok(());
        };
        if playlist.is_empty() {
            return Ok(());
        }
        let Some(media) = playlist.current_media() else {
            tracing::debug!("play() ignored: no playlist entry selected");
            return Ok(());
        };

        let status = self.engine.status();
        if self.media.as_deref() == Some(media.as_str()) && status.paused {
            self.engine.resume();
            self.timer.arm(Instant::now());
            self.set_state(PlaybackState::Playing);
            tracing::debug!("Resumed {}", media);
            return Ok(());
        }

        self.engine.close();
        self.media = Some(media.clone());
        if !self.engine.open(&media) {
            let error = self.engine.last_error();
            tracing::error!("Failed to open {}: {}", media, error);
            // The previous stream is already closed
            self.timer.disarm();
            self.set_state(PlaybackState::Stopped);
            return Err(PlaybackError::EngineOpenFailed(error));
        }

        self.timer.arm(Instant::now());
        self.emit(PlaybackEvent::PositionChanged { position_ms: 0 });
        let duration = self.engine.duration();
        self.emit(PlaybackEvent::DurationChanged {
            duration_ms: as_millis(duration),
        });
        self.set_state(PlaybackState::Playing);

        if !self.engine.play() {
            let error = self.engine.last_error();
            tracing::error!("Failed to start {}: {}", media, error);
            self.timer.disarm();
            self.set_state(PlaybackState::Stopped);
            return Err(PlaybackError::EngineStartFailed(error));
        }

        if let Some(level) = self.volume_preference {
            self.set_volume(level);
        }
        tracing::debug!("Playing {} ({:?})", media, duration);
        Ok(())
    }

    /// Select the next playlist entry, wrapping to the first
    ///
    /// Only moves the selection; call [`play`](Self::play) to start it.
    pub fn play_next(&mut self) {
        let Some(playlist) = self.playlist.as_deref_mut() else {
            return;
        };
        let count = playlist.media_count();
        if count == 0 {
            return;
        }
        let next = playlist.current_index().map_or(0, |index| index + 1);
        playlist.set_current_index(if next >= count { 0 } else { next });
    }

    /// Select the previous playlist entry, stopping at the first
    pub fn play_previous(&mut self) {
        let Some(playlist) = self.playlist.as_deref_mut() else {
            return;
        };
        if playlist.is_empty() {
            return;
        }
        let previous = playlist
            .current_index()
            .map_or(0, |index| index.saturating_sub(1));
        playlist.set_current_index(previous);
    }

    pub fn pause(&mut self) {
        self.engine.pause();
        self.timer.disarm();
        self.set_state(PlaybackState::Paused);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.timer.disarm();
        self.set_state(PlaybackState::Stopped);
    }

    /// Seek to an absolute position from the start of the stream
    pub fn set_position(&mut self, position: Duration) {
        self.engine.seek(position);
    }

    /// Release the loaded stream after the playlist dropped the current entry
    ///
    /// The remembered media identifier is left alone; the next `play()` compares
    /// against the playlist again and reopens.
    pub fn remove_current_media(&mut self) {
        self.timer.disarm();
        self.engine.close();
        self.set_state(PlaybackState::Stopped);
    }

    // ===== Progress loop =====

    /// One progress tick
    ///
    /// Reports the position, advances the spatial echo, and handles the end of the
    /// stream: either stop, or advance the playlist and start the next entry.
    pub fn on_timer_tick(&mut self) {
        let position = self.engine.position();
        self.emit(PlaybackEvent::PositionChanged {
            position_ms: as_millis(position),
        });

        if let Some(params) = self.echo.advance() {
            self.engine.set_echo_params(&params);
        }

        let status = self.engine.status();
        if !status.is_idle() {
            return;
        }
        self.timer.disarm();

        let action = match self.playlist.as_deref_mut() {
            Some(playlist) => {
                let policy = playlist.repeat_policy();
                completion_action(status, policy, || playlist.advance())
            }
            None => CompletionAction::Finish,
        };

        match action {
            CompletionAction::KeepPolling => {}
            CompletionAction::Finish => {
                tracing::debug!("Playback finished");
                self.finish_playback();
            }
            CompletionAction::PlayNext(index) => {
                tracing::debug!("Track finished, advancing to entry {}", index);
                if let Err(e) = self.play() {
                    tracing::warn!("Could not start next entry: {}", e);
                    self.emit(PlaybackEvent::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    fn finish_playback(&mut self) {
        self.engine.stop();
        self.timer.disarm();
        self.state = PlaybackState::Stopped;
        self.emit(PlaybackEvent::PositionChanged { position_ms: 0 });
        self.emit(PlaybackEvent::StateChanged {
            state: PlaybackState::Stopped,
        });
    }

    // ===== Volume =====

    /// Set volume (0-100) on both channels
    pub fn set_volume(&mut self, level: u8) {
        self.volume = level.min(100);
        self.engine.set_volume(self.volume, self.volume);
    }

    /// Last explicitly set volume level
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Mute leaves the stored level alone so unmute can restore it
    pub fn set_muted(&mut self, muted: bool) {
        if muted {
            self.engine.set_volume(0, 0);
        } else {
            self.engine.set_volume(self.volume, self.volume);
        }
    }

    /// True whenever the engine volume is 0, however it got there
    pub fn is_muted(&self) -> bool {
        self.engine.volume() == (0, 0)
    }

    /// Volume re-applied after each successful start (`None` = leave the engine alone)
    pub fn set_volume_preference(&mut self, preference: Option<u8>) {
        self.volume_preference = preference.map(|level| level.min(100));
    }

    // ===== Effects =====

    /// Flip the spatial echo effect
    ///
    /// The returned value carries both the flag before the call and after it.
    pub fn toggle_spatial_effect(&mut self) -> EffectToggle {
        let toggle = self.echo.toggle();
        self.engine.set_echo_enabled(toggle.enabled);
        toggle
    }

    pub fn set_eq_effect(&mut self, gains: &[i32]) {
        self.equalizer.set_band_gains(&mut self.engine, gains);
    }

    pub fn set_eq_enabled(&mut self, enabled: bool) {
        self.equalizer.set_enabled(&mut self.engine, enabled);
    }

    pub fn load_eq_presets(&mut self) {
        self.equalizer.load_preset_table(&mut self.engine);
    }

    pub fn reset_eq_effect(&mut self) {
        self.equalizer.reset_to_default(&mut self.engine);
    }

    /// Apply a one-shot special effect; ignored unless playing
    pub fn set_special_effect(&mut self, effect: SpecialEffect) {
        if self.state != PlaybackState::Playing {
            tracing::debug!("Ignoring {} while {:?}", effect, self.state);
            return;
        }

        let engine: &mut dyn AudioEngine = &mut self.engine;
        let eq = self.equalizer.as_mut();
        match effect {
            SpecialEffect::Echo => eq.echo(engine),
            SpecialEffect::MixChannels => eq.mix_channels(engine),
            SpecialEffect::Reverse => eq.reverse(engine),
            SpecialEffect::SideCut => eq.side_cut(engine),
            SpecialEffect::CenterCut => eq.center_cut(engine),
            SpecialEffect::RateUp => eq.rate_up(engine),
            SpecialEffect::RateDown => eq.rate_down(engine),
            SpecialEffect::PitchUp => eq.pitch_up(engine),
            SpecialEffect::PitchDown => eq.pitch_down(engine),
            SpecialEffect::TempoUp => eq.tempo_up(engine),
            SpecialEffect::TempoDown => eq.tempo_down(engine),
            SpecialEffect::FadeOut => eq.fade_out(engine),
            SpecialEffect::FadeIn => eq.fade_in(engine),
        }
    }

    // ===== Playlist =====

    /// Assign a playlist, returning the one it replaces
    pub fn set_playlist(&mut self, playlist: Box<dyn Playlist>) -> Option<Box<dyn Playlist>> {
        self.playlist.replace(playlist)
    }

    pub fn playlist(&self) -> Option<&(dyn Playlist + 'static)> {
        self.playlist.as_deref()
    }

    pub fn playlist_mut(&mut self) -> Option<&mut (dyn Playlist + 'static)> {
        self.playlist.as_deref_mut()
    }

    // ===== State =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Identifier of the most recently opened media
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    pub fn position(&self) -> Duration {
        self.engine.position()
    }

    pub fn duration(&self) -> Duration {
        self.engine.duration()
    }

    pub fn spatial_effect_enabled(&self) -> bool {
        self.echo.is_enabled()
    }

    /// Phase of the spatial echo, in radians
    pub fn echo_phase(&self) -> f32 {
        self.echo.phase()
    }

    pub fn timer(&self) -> &ProgressTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut ProgressTimer {
        &mut self.timer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            tracing::debug!("State {:?} -> {:?}", self.state, state);
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }
}

impl<E: AudioEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.engine.close();
    }
}
