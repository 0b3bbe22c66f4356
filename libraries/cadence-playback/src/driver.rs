//! Single-threaded player loop
//!
//! Serializes user commands and progress ticks on one thread. Commands arrive over a
//! channel; between commands the loop sleeps until the progress timer is due.

use crate::controller::PlaybackController;
use crate::engine::AudioEngine;
use crate::events::PlaybackEvent;
use crate::types::SpecialEffect;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Commands sent to the player loop
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Play (or resume) the current playlist entry
    Play,

    /// Pause playback
    Pause,

    /// Stop playback
    Stop,

    /// Select the next entry and play it
    Next,

    /// Select the previous entry and play it
    Previous,

    /// Select an entry by index and play it
    SelectIndex(usize),

    /// Seek to an absolute position
    Seek(Duration),

    /// Set volume (0-100)
    SetVolume(u8),

    /// Mute or unmute
    SetMuted(bool),

    /// Flip the spatial echo effect
    ToggleSpatialEffect,

    /// Apply a one-shot special effect
    SetSpecialEffect(SpecialEffect),

    /// Set equalizer band gains
    SetEqGains(Vec<i32>),

    /// Enable or disable the equalizer
    SetEqEnabled(bool),

    /// Load the preset table and apply the configured preset
    LoadEqPresets,

    /// Reset the equalizer to flat
    ResetEq,

    /// The playlist dropped its current entry
    RemoveCurrentMedia,

    /// Exit the loop
    Shutdown,
}

/// Owns a controller and runs it against a command channel
pub struct PlayerLoop<E: AudioEngine> {
    controller: PlaybackController<E>,
    commands: Receiver<PlayerCommand>,
    events: Sender<PlaybackEvent>,
}

impl<E: AudioEngine> PlayerLoop<E> {
    pub fn new(
        controller: PlaybackController<E>,
        commands: Receiver<PlayerCommand>,
        events: Sender<PlaybackEvent>,
    ) -> Self {
        Self {
            controller,
            commands,
            events,
        }
    }

    pub fn controller(&self) -> &PlaybackController<E> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<E> {
        &mut self.controller
    }

    /// Run until `Shutdown` arrives or every command sender is gone
    ///
    /// Returns the controller so the caller can inspect or reuse it.
    pub fn run(mut self) -> PlaybackController<E> {
        tracing::debug!("Player loop started");

        loop {
            let received = match self.controller.timer().time_until_due(Instant::now()) {
                Some(wait) => self.commands.recv_timeout(wait),
                None => self
                    .commands
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(PlayerCommand::Shutdown) => break,
                Ok(command) => self.dispatch(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("Command channel closed");
                    break;
                }
            }

            if self.controller.timer_mut().poll(Instant::now()) {
                self.controller.on_timer_tick();
            }
            self.forward_events();
        }

        self.forward_events();
        tracing::debug!("Player loop stopped");
        self.controller
    }

    /// Apply a single command to the controller
    pub fn dispatch(&mut self, command: PlayerCommand) {
        tracing::trace!("Command: {:?}", command);

        let result = match command {
            PlayerCommand::Play => self.controller.play(),
            PlayerCommand::Pause => {
                self.controller.pause();
                Ok(())
            }
            PlayerCommand::Stop => {
                self.controller.stop();
                Ok(())
            }
            PlayerCommand::Next => {
                self.controller.play_next();
                self.controller.play()
            }
            PlayerCommand::Previous => {
                self.controller.play_previous();
                self.controller.play()
            }
            PlayerCommand::SelectIndex(index) => match self.controller.playlist_mut() {
                Some(playlist) => {
                    playlist.set_current_index(index);
                    self.controller.play()
                }
                None => Ok(()),
            },
            PlayerCommand::Seek(position) => {
                self.controller.set_position(position);
                Ok(())
            }
            PlayerCommand::SetVolume(level) => {
                self.controller.set_volume(level);
                Ok(())
            }
            PlayerCommand::SetMuted(muted) => {
                self.controller.set_muted(muted);
                Ok(())
            }
            PlayerCommand::ToggleSpatialEffect => {
                let toggle = self.controller.toggle_spatial_effect();
                tracing::info!("Spatial effect {}", if toggle.enabled { "on" } else { "off" });
                Ok(())
            }
            PlayerCommand::SetSpecialEffect(effect) => {
                self.controller.set_special_effect(effect);
                Ok(())
            }
            PlayerCommand::SetEqGains(gains) => {
                self.controller.set_eq_effect(&gains);
                Ok(())
            }
            PlayerCommand::SetEqEnabled(enabled) => {
                self.controller.set_eq_enabled(enabled);
                Ok(())
            }
            PlayerCommand::LoadEqPresets => {
                self.controller.load_eq_presets();
                Ok(())
            }
            PlayerCommand::ResetEq => {
                self.controller.reset_eq_effect();
                Ok(())
            }
            PlayerCommand::RemoveCurrentMedia => {
                self.controller.remove_current_media();
                Ok(())
            }
            PlayerCommand::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            self.forward_events();
            self.events
                .send(PlaybackEvent::Error {
                    message: e.to_string(),
                })
                .ok();
        }
    }

    fn forward_events(&mut self) {
        for event in self.controller.drain_events() {
            if self.events.send(event).is_err() {
                // Nobody is listening any more; keep playing regardless
                break;
            }
        }
    }
}
