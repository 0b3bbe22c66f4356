//! Player loop tests
//!
//! Commands are queued on a crossbeam channel before `run()` so the loop handles them
//! in order on the test thread.

use cadence_playback::{
    AudioEngine, ControllerConfig, MediaPlaylist, PlaybackController, PlaybackEvent,
    PlaybackState, PlayerCommand, PlayerLoop, RepeatPolicy, SimulatedEngine, SpecialEffect,
};
use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::time::Duration;

// ===== Test Helpers =====

const TRACKS: [&str; 3] = ["/music/a.flac", "/music/b.flac", "/music/c.flac"];

struct Harness {
    player: PlayerLoop<SimulatedEngine>,
    commands: Sender<PlayerCommand>,
    events: Receiver<PlaybackEvent>,
}

fn harness_with(
    engine: SimulatedEngine,
    config: &ControllerConfig,
    policy: RepeatPolicy,
) -> Harness {
    let mut controller = PlaybackController::new(engine, config);
    controller.set_playlist(Box::new(MediaPlaylist::new(TRACKS, policy)));

    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    Harness {
        player: PlayerLoop::new(controller, command_rx, event_tx),
        commands: command_tx,
        events: event_rx,
    }
}

fn harness() -> Harness {
    harness_with(
        SimulatedEngine::new(),
        &ControllerConfig::default(),
        RepeatPolicy::PlayOrder,
    )
}

fn run_commands(
    harness: Harness,
    commands: Vec<PlayerCommand>,
) -> (PlaybackController<SimulatedEngine>, Vec<PlaybackEvent>) {
    for command in commands {
        harness.commands.send(command).unwrap();
    }
    harness.commands.send(PlayerCommand::Shutdown).unwrap();

    let controller = harness.player.run();
    let events = harness.events.try_iter().collect();
    (controller, events)
}

// ===== Tests =====

#[test]
fn test_commands_run_in_order() {
    let (controller, events) = run_commands(
        harness(),
        vec![
            PlayerCommand::Play,
            PlayerCommand::SetVolume(40),
            PlayerCommand::Pause,
        ],
    );

    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.volume(), 40);
    assert_eq!(
        events,
        vec![
            PlaybackEvent::PositionChanged { position_ms: 0 },
            PlaybackEvent::DurationChanged {
                duration_ms: 180_000
            },
            PlaybackEvent::StateChanged {
                state: PlaybackState::Playing
            },
            PlaybackEvent::StateChanged {
                state: PlaybackState::Paused
            },
        ]
    );
}

#[test]
fn test_selection_commands_start_playback() {
    let (controller, _) = run_commands(harness(), vec![PlayerCommand::SelectIndex(2)]);
    assert_eq!(controller.media(), Some(TRACKS[2]));
    assert_eq!(controller.state(), PlaybackState::Playing);

    let (controller, _) = run_commands(
        harness(),
        vec![PlayerCommand::SelectIndex(2), PlayerCommand::Next],
    );
    assert_eq!(controller.media(), Some(TRACKS[0]));

    let (controller, _) = run_commands(
        harness(),
        vec![
            PlayerCommand::SelectIndex(1),
            PlayerCommand::Previous,
            PlayerCommand::Previous,
        ],
    );
    assert_eq!(controller.media(), Some(TRACKS[0]));
    // Playing the same entry again restarts it
    assert_eq!(controller.engine().open_count(), 3);
}

#[test]
fn test_failures_are_forwarded_as_events() {
    let mut engine = SimulatedEngine::new();
    engine.mark_unreadable(TRACKS[0]);
    let harness = harness_with(engine, &ControllerConfig::default(), RepeatPolicy::PlayOrder);

    let (controller, events) = run_commands(harness, vec![PlayerCommand::Play]);

    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        PlaybackEvent::Error { message } if message.contains("cannot open file")
    ));
}

#[test]
fn test_effect_and_eq_commands() {
    let (controller, _) = run_commands(
        harness(),
        vec![
            PlayerCommand::Play,
            PlayerCommand::ToggleSpatialEffect,
            PlayerCommand::SetSpecialEffect(SpecialEffect::RateUp),
            PlayerCommand::SetEqEnabled(true),
            PlayerCommand::SetEqGains(vec![2, 2, 2]),
            PlayerCommand::SetMuted(true),
            PlayerCommand::Seek(Duration::from_secs(12)),
        ],
    );

    let engine = controller.engine();
    assert!(controller.spatial_effect_enabled());
    assert!(engine.echo_enabled());
    assert_eq!(engine.rate(), 110);
    assert!(engine.eq_enabled());
    assert_eq!(engine.eq_band_gains(), &[2, 2, 2]);
    assert!(controller.is_muted());
    assert_eq!(controller.position(), Duration::from_secs(12));
}

#[test]
fn test_reset_and_remove_commands() {
    let (controller, _) = run_commands(
        harness(),
        vec![
            PlayerCommand::Play,
            PlayerCommand::SetSpecialEffect(SpecialEffect::Reverse),
            PlayerCommand::LoadEqPresets,
            PlayerCommand::ResetEq,
            PlayerCommand::RemoveCurrentMedia,
        ],
    );

    assert!(!controller.engine().dsp().reverse);
    assert_eq!(controller.engine().eq_band_gains(), &[0; 10]);
    assert_eq!(controller.engine().media(), None);
    assert_eq!(controller.state(), PlaybackState::Stopped);
}

#[test]
fn test_loop_exits_when_senders_are_dropped() {
    let harness = harness();
    harness.commands.send(PlayerCommand::Play).unwrap();
    drop(harness.commands);

    let controller = harness.player.run();
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[test]
fn test_dispatch_without_running() {
    let mut harness = harness();
    harness.player.dispatch(PlayerCommand::Play);
    harness.player.dispatch(PlayerCommand::Stop);

    assert_eq!(harness.player.controller().state(), PlaybackState::Stopped);
    harness.player.controller_mut().set_volume(10);
    assert_eq!(harness.player.controller().volume(), 10);
}

#[test]
fn test_timer_ticks_detect_end_of_track() {
    let engine =
        SimulatedEngine::with_wall_clock().with_default_length(Duration::from_millis(30));
    let config = ControllerConfig {
        tick_interval_ms: 10,
        ..Default::default()
    };
    let harness = harness_with(engine, &config, RepeatPolicy::PlayOnce);

    harness.commands.send(PlayerCommand::Play).unwrap();
    let commands = harness.commands.clone();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(800));
        commands.send(PlayerCommand::Shutdown).ok();
    });

    let controller = harness.player.run();
    stopper.join().unwrap();

    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert!(!controller.timer().is_armed());

    let events: Vec<PlaybackEvent> = harness.events.try_iter().collect();
    assert!(events.iter().any(|event| matches!(
        event,
        PlaybackEvent::PositionChanged { position_ms } if *position_ms > 0
    )));
    assert_eq!(
        events.last(),
        Some(&PlaybackEvent::StateChanged {
            state: PlaybackState::Stopped
        })
    );
}
