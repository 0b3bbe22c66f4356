//! Property-based tests for the playback controller
//!
//! Uses proptest to check selection, volume and echo invariants across many inputs.

use cadence_playback::{
    AudioEngine, ControllerConfig, EchoParams, MediaPlaylist, PlaybackController, PlaybackState,
    Playlist, RepeatPolicy, SimulatedEngine, SpatialEcho,
};
use proptest::prelude::*;
use std::time::Duration;

// ===== Helpers =====

fn controller_with_entries(count: usize) -> PlaybackController<SimulatedEngine> {
    let entries: Vec<String> = (0..count).map(|i| format!("/music/{i:03}.flac")).collect();
    let mut controller =
        PlaybackController::new(SimulatedEngine::new(), &ControllerConfig::default());
    controller.set_playlist(Box::new(MediaPlaylist::new(entries, RepeatPolicy::PlayOrder)));
    controller
}

fn selected(controller: &PlaybackController<SimulatedEngine>) -> Option<usize> {
    controller.playlist().and_then(|playlist| playlist.current_index())
}

// ===== Property Tests =====

proptest! {
    /// Property: next wraps to 0 at the end, previous never goes below 0
    #[test]
    fn next_wraps_and_previous_clamps(count in 1usize..40, start in 0usize..40) {
        let start = start % count;
        let mut controller = controller_with_entries(count);
        controller.playlist_mut().unwrap().set_current_index(start);

        controller.play_next();
        prop_assert_eq!(selected(&controller), Some((start + 1) % count));

        controller.playlist_mut().unwrap().set_current_index(start);
        controller.play_previous();
        prop_assert_eq!(selected(&controller), Some(start.saturating_sub(1)));
    }

    /// Property: selection always stays within the playlist
    #[test]
    fn selection_stays_in_range(
        count in 1usize..20,
        moves in prop::collection::vec(any::<bool>(), 0..100)
    ) {
        let mut controller = controller_with_entries(count);
        for forward in moves {
            if forward {
                controller.play_next();
            } else {
                controller.play_previous();
            }
            let index = selected(&controller);
            prop_assert!(index.is_some_and(|index| index < count));
        }
        prop_assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    /// Property: mute then unmute restores whatever level was set
    #[test]
    fn mute_round_trip_restores_level(level in 0u8..=255) {
        let mut controller = controller_with_entries(1);
        controller.set_volume(level);
        let expected = level.min(100);

        controller.set_muted(true);
        prop_assert!(controller.is_muted());
        prop_assert_eq!(controller.volume(), expected);

        controller.set_muted(false);
        prop_assert_eq!(controller.engine().volume(), (expected, expected));
        prop_assert_eq!(controller.is_muted(), expected == 0);
    }

    /// Property: phase grows by exactly the step on every enabled tick and never while
    /// disabled, and each emitted parameter set matches the new phase
    #[test]
    fn echo_phase_is_monotonic(
        step in 0.01f32..2.0,
        toggles in prop::collection::vec(any::<bool>(), 1..60)
    ) {
        let mut echo = SpatialEcho::new(step);
        let mut previous = echo.phase();
        let mut enabled_ticks = 0u16;

        for flip in toggles {
            if flip {
                echo.toggle();
            }
            let enabled = echo.is_enabled();
            let params = echo.advance();

            prop_assert_eq!(params.is_some(), enabled);
            if enabled {
                enabled_ticks += 1;
                prop_assert!(echo.phase() > previous);
                prop_assert_eq!(params, Some(EchoParams::at_phase(echo.phase())));
            } else {
                prop_assert_eq!(echo.phase(), previous);
            }
            previous = echo.phase();

            let expected = f32::from(enabled_ticks) * step;
            prop_assert!((echo.phase() - expected).abs() <= 1e-3 * expected.max(1.0));
        }
    }

    /// Property: echo parameters follow cos(phase) and sin(phase / 2)
    #[test]
    fn echo_params_follow_phase(phase in -20.0f32..20.0) {
        let params = EchoParams::at_phase(phase);

        prop_assert_eq!(params.left_delay_ms, 1000);
        prop_assert_eq!(params.right_delay_ms, 500);
        prop_assert_eq!(params.left_echo_volume, 20);
        prop_assert_eq!(params.right_echo_volume, 20);
        prop_assert_eq!(params.left_source_volume, (100.0 * phase.cos()) as i32);
        prop_assert_eq!(params.right_source_volume, (100.0 * (phase * 0.5).sin()) as i32);
        prop_assert!((-100..=100).contains(&params.left_source_volume));
        prop_assert!((-100..=100).contains(&params.right_source_volume));
    }

    /// Property: a PlayOnce track always finishes in Stopped without moving the selection
    #[test]
    fn play_once_always_finishes(count in 1usize..10, start in 0usize..10, length in 1u64..30) {
        let start = start % count;
        let entries: Vec<String> = (0..count).map(|i| format!("/music/{i}.flac")).collect();
        let engine = SimulatedEngine::new().with_default_length(Duration::from_secs(length));
        let mut controller = PlaybackController::new(engine, &ControllerConfig::default());
        let mut playlist = MediaPlaylist::new(entries, RepeatPolicy::PlayOnce);
        playlist.set_current_index(start);
        controller.set_playlist(Box::new(playlist));

        controller.play().unwrap();
        controller.engine_mut().advance(Duration::from_secs(length));
        controller.on_timer_tick();

        prop_assert_eq!(controller.state(), PlaybackState::Stopped);
        prop_assert_eq!(selected(&controller), Some(start));
        prop_assert_eq!(controller.engine().open_count(), 1);
    }
}
