//! Cadence - Playback Control
//!
//! Engine-agnostic playback control for Cadence.
//!
//! This crate provides:
//! - Playback state machine (Stopped, Playing, Paused) with resume-in-place
//! - 1 Hz progress polling with end-of-track detection
//! - Repeat policies (PlayOnce, PlayOrder, OneLoop, ListLoop, Random)
//! - Volume and mute
//! - Spatial echo modulation driven by the progress tick
//! - Equalizer presets and thirteen one-shot special effects
//!
//! # Architecture
//!
//! `cadence-playback` decodes nothing:
//! - The decode/render backend is an [`AudioEngine`]
//! - Equalizers implement [`Equalizer`] on top of the engine's DSP primitives
//! - Playlists implement [`Playlist`]
//!
//! [`SimulatedEngine`], [`PresetEqualizer`] and [`MediaPlaylist`] are ready-made
//! implementations of each.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{
//!     ControllerConfig, MediaPlaylist, PlaybackController, PlaybackEvent, PlaybackState,
//!     RepeatPolicy, SimulatedEngine,
//! };
//! use std::time::Duration;
//!
//! let engine = SimulatedEngine::new().with_default_length(Duration::from_secs(2));
//! let mut controller = PlaybackController::new(engine, &ControllerConfig::default());
//! controller.set_playlist(Box::new(MediaPlaylist::new(
//!     ["/music/one.flac", "/music/two.flac"],
//!     RepeatPolicy::PlayOrder,
//! )));
//!
//! controller.play().unwrap();
//! assert_eq!(controller.state(), PlaybackState::Playing);
//!
//! // Let the first track run out; the next tick moves on to the second one
//! controller.engine_mut().advance(Duration::from_secs(3));
//! controller.on_timer_tick();
//! assert_eq!(controller.media(), Some("/music/two.flac"));
//!
//! let events = controller.drain_events();
//! assert!(events.contains(&PlaybackEvent::DurationChanged { duration_ms: 2000 }));
//! ```
//!
//! # Example: Running the Player Loop
//!
//! ```rust,no_run
//! use cadence_playback::{
//!     ControllerConfig, PlaybackController, PlayerCommand, PlayerLoop, SimulatedEngine,
//! };
//!
//! let (command_tx, command_rx) = crossbeam_channel::unbounded();
//! let (event_tx, event_rx) = crossbeam_channel::unbounded();
//!
//! let controller =
//!     PlaybackController::new(SimulatedEngine::with_wall_clock(), &ControllerConfig::default());
//! let player = PlayerLoop::new(controller, command_rx, event_tx);
//!
//! std::thread::spawn(move || {
//!     for event in event_rx {
//!         println!("{:?}", event);
//!     }
//! });
//!
//! command_tx.send(PlayerCommand::Play).unwrap();
//! command_tx.send(PlayerCommand::Shutdown).unwrap();
//! player.run();
//! ```

mod controller;
mod driver;
mod echo;
mod engine;
mod equalizer;
mod error;
mod events;
mod playlist;
mod sim;
mod timer;
pub mod types;

// Public exports
pub use controller::{completion_action, CompletionAction, PlaybackController};
pub use driver::{PlayerCommand, PlayerLoop};
pub use echo::{EchoParams, SpatialEcho};
pub use engine::AudioEngine;
pub use equalizer::{
    builtin_presets, EffectFlags, EqPreset, EqSettings, Equalizer, PresetEqualizer, BAND_COUNT,
    BAND_FREQUENCIES,
};
pub use error::{EngineError, PlaybackError, Result};
pub use events::PlaybackEvent;
pub use playlist::{MediaPlaylist, Playlist};
pub use sim::{Clock, DspState, SimulatedEngine, ERR_NO_STREAM, ERR_OPEN, ERR_OUTPUT};
pub use timer::ProgressTimer;
pub use types::{
    ControllerConfig, EffectToggle, EngineStatus, PlaybackState, RepeatPolicy, SpecialEffect,
};
