//! Equalizer controller
//!
//! Provides band gains, an enable switch, a preset table and thirteen one-shot
//! special effects. Equalizers hold no engine handle of their own: every call is
//! given the engine the controller owns.
//!
//! Built-in presets (10 bands, dB):
//! - Flat, Bass Boost, Treble Boost, V-Shape, Vocal, Rock, Electronic, Acoustic

use crate::echo::EchoParams;
use crate::engine::AudioEngine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of bands in the built-in presets
pub const BAND_COUNT: usize = 10;

/// Center frequencies of the ten bands (Hz)
pub const BAND_FREQUENCIES: [u32; BAND_COUNT] =
    [31, 62, 125, 250, 500, 1000, 2000, 4000, 8000, 16000];

/// Step for rate/pitch/tempo effects, in percent
const PERCENT_STEP: u32 = 10;
const PERCENT_MIN: u32 = 50;
const PERCENT_MAX: u32 = 200;

/// Fade duration for fade-in/fade-out
const FADE_DURATION: Duration = Duration::from_secs(5);

/// Fixed echo used by the one-shot echo effect
const ECHO_PRESET: EchoParams = EchoParams {
    left_delay_ms: 300,
    left_echo_volume: 30,
    left_source_volume: 80,
    right_delay_ms: 300,
    right_echo_volume: 30,
    right_source_volume: 80,
};

/// Equalizer operations consumed by the playback controller
pub trait Equalizer {
    /// Apply per-band gains (dB)
    fn set_band_gains(&mut self, engine: &mut dyn AudioEngine, gains: &[i32]);

    fn set_enabled(&mut self, engine: &mut dyn AudioEngine, enabled: bool);

    /// Load the preset table and apply the configured selection
    fn load_preset_table(&mut self, engine: &mut dyn AudioEngine);

    /// Back to flat, with every special effect switched off
    fn reset_to_default(&mut self, engine: &mut dyn AudioEngine);

    // ===== One-shot special effects =====

    fn echo(&mut self, engine: &mut dyn AudioEngine);
    fn mix_channels(&mut self, engine: &mut dyn AudioEngine);
    fn reverse(&mut self, engine: &mut dyn AudioEngine);
    fn side_cut(&mut self, engine: &mut dyn AudioEngine);
    fn center_cut(&mut self, engine: &mut dyn AudioEngine);
    fn rate_up(&mut self, engine: &mut dyn AudioEngine);
    fn rate_down(&mut self, engine: &mut dyn AudioEngine);
    fn pitch_up(&mut self, engine: &mut dyn AudioEngine);
    fn pitch_down(&mut self, engine: &mut dyn AudioEngine);
    fn tempo_up(&mut self, engine: &mut dyn AudioEngine);
    fn tempo_down(&mut self, engine: &mut dyn AudioEngine);
    fn fade_out(&mut self, engine: &mut dyn AudioEngine);
    fn fade_in(&mut self, engine: &mut dyn AudioEngine);
}

/// Named band preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqPreset {
    pub name: String,
    pub gains: Vec<i32>,
}

impl EqPreset {
    fn new(name: &str, gains: [i32; BAND_COUNT]) -> Self {
        Self {
            name: name.to_string(),
            gains: gains.to_vec(),
        }
    }
}

/// Built-in preset table
pub fn builtin_presets() -> Vec<EqPreset> {
    vec![
        EqPreset::new("Flat", [0; BAND_COUNT]),
        EqPreset::new("Bass Boost", [6, 5, 4, 2, 0, 0, 0, 0, 0, 0]),
        EqPreset::new("Treble Boost", [0, 0, 0, 0, 0, 0, 2, 4, 5, 6]),
        EqPreset::new("V-Shape", [5, 4, 2, -1, -2, -2, -1, 2, 4, 5]),
        EqPreset::new("Vocal", [-2, -1, 0, 2, 4, 4, 2, 0, -1, -2]),
        EqPreset::new("Rock", [4, 3, 1, 0, -1, 0, 1, 3, 4, 4]),
        EqPreset::new("Electronic", [5, 4, 2, 0, 1, 2, 1, 3, 4, 4]),
        EqPreset::new("Acoustic", [2, 1, 0, 1, 2, 2, 1, 2, 2, 1]),
    ]
}

/// Equalizer settings supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqSettings {
    /// Whether the band equalizer is switched on
    pub enabled: bool,

    /// Preset to apply on `load_preset_table` (case-insensitive name)
    pub preset: String,

    /// Gains used instead of a preset when non-empty
    pub custom_gains: Vec<i32>,
}

impl Default for EqSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            preset: "Flat".to_string(),
            custom_gains: Vec::new(),
        }
    }
}

/// Toggle state of the on/off special effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectFlags {
    pub channel_mix: bool,
    pub reverse: bool,
    pub side_cut: bool,
    pub center_cut: bool,
}

/// Preset-table equalizer built on the engine's DSP primitives
#[derive(Debug, Clone)]
pub struct PresetEqualizer {
    settings: EqSettings,
    presets: Vec<EqPreset>,
    gains: Vec<i32>,
    flags: EffectFlags,
}

impl PresetEqualizer {
    pub fn new(settings: EqSettings) -> Self {
        Self {
            settings,
            presets: Vec::new(),
            gains: vec![0; BAND_COUNT],
            flags: EffectFlags::default(),
        }
    }

    /// Gains most recently applied to the engine
    pub fn gains(&self) -> &[i32] {
        &self.gains
    }

    pub fn presets(&self) -> &[EqPreset] {
        &self.presets
    }

    pub fn flags(&self) -> EffectFlags {
        self.flags
    }

    pub fn settings(&self) -> &EqSettings {
        &self.settings
    }

    fn find_preset(&self, name: &str) -> Option<&EqPreset> {
        self.presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }

    fn step_up(current: u32) -> u32 {
        (current + PERCENT_STEP).min(PERCENT_MAX)
    }

    fn step_down(current: u32) -> u32 {
        current.saturating_sub(PERCENT_STEP).max(PERCENT_MIN)
    }
}

impl Default for PresetEqualizer {
    fn default() -> Self {
        Self::new(EqSettings::default())
    }
}

impl Equalizer for PresetEqualizer {
    fn set_band_gains(&mut self, engine: &mut dyn AudioEngine, gains: &[i32]) {
        self.gains = gains.to_vec();
        engine.set_eq_band_gains(gains);
    }

    fn set_enabled(&mut self, engine: &mut dyn AudioEngine, enabled: bool) {
        self.settings.enabled = enabled;
        engine.set_eq_enabled(enabled);
    }

    fn load_preset_table(&mut self, engine: &mut dyn AudioEngine) {
        self.presets = builtin_presets();

        let gains = if self.settings.custom_gains.is_empty() {
            match self.find_preset(&self.settings.preset) {
                Some(preset) => preset.gains.clone(),
                None => {
                    tracing::warn!(
                        "Unknown equalizer preset {:?}, using flat",
                        self.settings.preset
                    );
                    vec![0; BAND_COUNT]
                }
            }
        } else {
            self.settings.custom_gains.clone()
        };

        let enabled = self.settings.enabled;
        self.set_enabled(engine, enabled);
        self.set_band_gains(engine, &gains);
    }

    fn reset_to_default(&mut self, engine: &mut dyn AudioEngine) {
        self.flags = EffectFlags::default();
        engine.set_channel_mix(false);
        engine.set_reverse(false);
        engine.set_side_cut(false);
        engine.set_center_cut(false);
        engine.set_rate(100);
        engine.set_pitch(100);
        engine.set_tempo(100);
        self.set_band_gains(engine, &[0; BAND_COUNT]);
    }

    fn echo(&mut self, engine: &mut dyn AudioEngine) {
        engine.set_echo_enabled(true);
        engine.set_echo_params(&ECHO_PRESET);
    }

    fn mix_channels(&mut self, engine: &mut dyn AudioEngine) {
        self.flags.channel_mix = !self.flags.channel_mix;
        engine.set_channel_mix(self.flags.channel_mix);
    }

    fn reverse(&mut self, engine: &mut dyn AudioEngine) {
        self.flags.reverse = !self.flags.reverse;
        engine.set_reverse(self.flags.reverse);
    }

    fn side_cut(&mut self, engine: &mut dyn AudioEngine) {
        self.flags.side_cut = !self.flags.side_cut;
        engine.set_side_cut(self.flags.side_cut);
    }

    fn center_cut(&mut self, engine: &mut dyn AudioEngine) {
        self.flags.center_cut = !self.flags.center_cut;
        engine.set_center_cut(self.flags.center_cut);
    }

    fn rate_up(&mut self, engine: &mut dyn AudioEngine) {
        let rate = Self::step_up(engine.rate());
        engine.set_rate(rate);
    }

    fn rate_down(&mut self, engine: &mut dyn AudioEngine) {
        let rate = Self::step_down(engine.rate());
        engine.set_rate(rate);
    }

    fn pitch_up(&mut self, engine: &mut dyn AudioEngine) {
        let pitch = Self::step_up(engine.pitch());
        engine.set_pitch(pitch);
    }

    fn pitch_down(&mut self, engine: &mut dyn AudioEngine) {
        let pitch = Self::step_down(engine.pitch());
        engine.set_pitch(pitch);
    }

    fn tempo_up(&mut self, engine: &mut dyn AudioEngine) {
        let tempo = Self::step_up(engine.tempo());
        engine.set_tempo(tempo);
    }

    fn tempo_down(&mut self, engine: &mut dyn AudioEngine) {
        let tempo = Self::step_down(engine.tempo());
        engine.set_tempo(tempo);
    }

    fn fade_out(&mut self, engine: &mut dyn AudioEngine) {
        let (level, _) = engine.volume();
        engine.slide_volume(level, 0, FADE_DURATION);
    }

    fn fade_in(&mut self, engine: &mut dyn AudioEngine) {
        let (level, _) = engine.volume();
        engine.slide_volume(0, level, FADE_DURATION);
    }
}
