//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing playing
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Playlist-owned rule for picking the next track when one finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatPolicy {
    /// Stop after the current track
    PlayOnce,

    /// Play through the list in order, stop at the end
    #[default]
    PlayOrder,

    /// Repeat the current track
    OneLoop,

    /// Play through the list in order, wrap at the end
    ListLoop,

    /// Pick a random entry each time
    Random,
}

impl FromStr for RepeatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play-once" | "once" => Ok(Self::PlayOnce),
            "play-order" | "order" => Ok(Self::PlayOrder),
            "one-loop" => Ok(Self::OneLoop),
            "list-loop" => Ok(Self::ListLoop),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown repeat policy: {other}")),
        }
    }
}

/// Engine playback status as reported by a status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStatus {
    pub playing: bool,
    pub paused: bool,
}

impl EngineStatus {
    /// Neither playing nor paused: the stream ran out or was stopped underneath us
    pub fn is_idle(&self) -> bool {
        !self.playing && !self.paused
    }
}

/// One-shot special effects applied through the equalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialEffect {
    Echo,
    MixChannels,
    Reverse,
    SideCut,
    CenterCut,
    RateUp,
    RateDown,
    PitchUp,
    PitchDown,
    TempoUp,
    TempoDown,
    FadeOut,
    FadeIn,
}

impl SpecialEffect {
    /// All effects, in their wire order
    pub const ALL: [SpecialEffect; 13] = [
        Self::Echo,
        Self::MixChannels,
        Self::Reverse,
        Self::SideCut,
        Self::CenterCut,
        Self::RateUp,
        Self::RateDown,
        Self::PitchUp,
        Self::PitchDown,
        Self::TempoUp,
        Self::TempoDown,
        Self::FadeOut,
        Self::FadeIn,
    ];

    /// Look up an effect by its wire index; unknown indices yield `None`
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Kebab-case name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::MixChannels => "mix-channels",
            Self::Reverse => "reverse",
            Self::SideCut => "side-cut",
            Self::CenterCut => "center-cut",
            Self::RateUp => "rate-up",
            Self::RateDown => "rate-down",
            Self::PitchUp => "pitch-up",
            Self::PitchDown => "pitch-down",
            Self::TempoUp => "tempo-up",
            Self::TempoDown => "tempo-down",
            Self::FadeOut => "fade-out",
            Self::FadeIn => "fade-in",
        }
    }
}

impl fmt::Display for SpecialEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpecialEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|effect| effect.name() == s)
            .ok_or_else(|| format!("unknown effect: {s}"))
    }
}

/// Result of toggling the spatial effect
///
/// `previous` is the flag before the call, `enabled` the flag after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectToggle {
    pub previous: bool,
    pub enabled: bool,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Progress poll period in milliseconds (default: 1000)
    pub tick_interval_ms: u64,

    /// Volume level before anything is set explicitly (0-100, default: 100)
    pub initial_volume: u8,

    /// Volume re-applied after each successful start; `None` leaves the engine alone
    pub volume_preference: Option<u8>,

    /// Phase advance of the spatial echo per tick, in radians (default: 0.5)
    pub echo_phase_step: f32,
}

impl ControllerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            initial_volume: 100,
            volume_preference: None,
            echo_phase_step: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.initial_volume, 100);
        assert_eq!(config.volume_preference, None);
        assert_eq!(config.echo_phase_step, 0.5);
    }

    #[test]
    fn special_effect_index_lookup() {
        assert_eq!(SpecialEffect::from_index(0), Some(SpecialEffect::Echo));
        assert_eq!(SpecialEffect::from_index(12), Some(SpecialEffect::FadeIn));
        assert_eq!(SpecialEffect::from_index(13), None);
        assert_eq!(SpecialEffect::from_index(255), None);
    }

    #[test]
    fn special_effect_names_round_trip() {
        for effect in SpecialEffect::ALL {
            assert_eq!(effect.name().parse::<SpecialEffect>(), Ok(effect));
        }
        assert!("warp-drive".parse::<SpecialEffect>().is_err());
    }

    #[test]
    fn repeat_policy_parsing() {
        assert_eq!("once".parse::<RepeatPolicy>(), Ok(RepeatPolicy::PlayOnce));
        assert_eq!("list-loop".parse::<RepeatPolicy>(), Ok(RepeatPolicy::ListLoop));
        assert!("sometimes".parse::<RepeatPolicy>().is_err());
    }

    #[test]
    fn idle_status() {
        assert!(EngineStatus::default().is_idle());
        assert!(!EngineStatus {
            playing: false,
            paused: true
        }
        .is_idle());
    }
}
