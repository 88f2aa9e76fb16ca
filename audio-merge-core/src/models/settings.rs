use serde::{Deserialize, Serialize};

use super::error::MergeError;
use crate::processing::fade_curve::FadeCurve;

/// Portion of a track to keep, in seconds.
///
/// `end_secs` of `None` keeps everything to the end of the track, and so does
/// the legacy `-1` sentinel. Any other negative end clamps to index 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimWindow {
    pub start_secs: f32,
    pub end_secs: Option<f32>,
}

impl TrimWindow {
    /// Legacy end value meaning "to the end of the track".
    pub const END_SENTINEL: f32 = -1.0;

    /// The whole track.
    pub const FULL: TrimWindow = TrimWindow {
        start_secs: 0.0,
        end_secs: None,
    };

    pub fn new(start_secs: f32, end_secs: Option<f32>) -> Self {
        Self { start_secs, end_secs }
    }

    /// Effective end, with the `-1` sentinel folded into `None`.
    pub fn end(&self) -> Option<f32> {
        self.end_secs.filter(|end| *end != Self::END_SENTINEL)
    }

    fn validate(&self, label: &str) -> Result<(), MergeError> {
        if !self.start_secs.is_finite() || self.start_secs < 0.0 {
            return Err(MergeError::InvalidRange(format!(
                "{label} start must be a non-negative time, got {}",
                self.start_secs
            )));
        }
        if let Some(end) = self.end() {
            if end < self.start_secs {
                return Err(MergeError::InvalidRange(format!(
                    "{label} ends at {end}s before it starts at {}s",
                    self.start_secs
                )));
            }
        }
        Ok(())
    }
}

impl Default for TrimWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// Parameters for joining two tracks end to start.
///
/// `gap_secs > 0` inserts silence and disables the crossfade entirely;
/// zero or negative gaps leave the crossfade in charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Length of the blended region in seconds.
    pub crossfade_secs: f32,

    /// Volume the first track decays to by the end of the crossfade.
    pub song1_min_volume: f32,

    /// Volume the second track starts from at the beginning of the crossfade.
    pub song2_min_volume: f32,

    /// Overall gain for the first track.
    pub song1_volume: f32,

    /// Overall gain for the second track.
    pub song2_volume: f32,

    pub song1_trim: TrimWindow,
    pub song2_trim: TrimWindow,

    /// Silence inserted between the tracks, in seconds.
    pub gap_secs: f32,

    pub fade_curve: FadeCurve,
}

impl MixSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, MergeError> {
        serde_json::from_str(json).map_err(|e| MergeError::InvalidSettings(format!("failed to parse mix settings: {}", e)))
    }

    /// Strict check for callers that want misordered or negative values
    /// reported instead of silently clamped by the mixers.
    pub fn validate(&self) -> Result<(), MergeError> {
        if !self.crossfade_secs.is_finite() || self.crossfade_secs < 0.0 {
            return Err(MergeError::InvalidSettings(format!(
                "crossfade duration must be non-negative, got {}",
                self.crossfade_secs
            )));
        }
        if !self.gap_secs.is_finite() {
            return Err(MergeError::InvalidSettings("gap duration must be finite".into()));
        }
        for (name, value) in [
            ("song1 min volume", self.song1_min_volume),
            ("song2 min volume", self.song2_min_volume),
            ("song1 volume", self.song1_volume),
            ("song2 volume", self.song2_volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MergeError::InvalidSettings(format!("{name} must be non-negative, got {value}")));
            }
        }
        self.song1_trim.validate("song1 trim")?;
        self.song2_trim.validate("song2 trim")?;
        Ok(())
    }

    /// Whether the gap policy overrides the crossfade.
    pub fn has_gap(&self) -> bool {
        self.gap_secs > 0.0
    }
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            crossfade_secs: 10.0,
            song1_min_volume: 0.0,
            song2_min_volume: 0.0,
            song1_volume: 1.0,
            song2_volume: 1.0,
            song1_trim: TrimWindow::FULL,
            song2_trim: TrimWindow::FULL,
            gap_secs: 0.0,
            fade_curve: FadeCurve::Linear,
        }
    }
}

/// Parameters for fading a main track out while an intro track comes in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutroIntroSettings {
    /// Seconds before the end of the main track where its fade begins.
    pub outro_fade_start_secs: f32,

    /// Seconds before the end of the main track where the intro enters.
    pub intro_start_delay_secs: f32,

    pub intro_volume: f32,
    pub main_volume: f32,

    /// Volume the main track reaches at its last sample (0.0 = silence).
    pub fade_to_volume: f32,

    pub fade_curve: FadeCurve,

    /// Derive the fade start from the intro instead of `outro_fade_start_secs`.
    /// Off by default; see [`OutroIntroSettings::effective_fade_start_secs`].
    pub auto_fade_from_intro: bool,

    /// Lead time added before the intro overlap when auto fading.
    pub extra_fade_secs: f32,
}

impl OutroIntroSettings {
    pub fn from_json(json: &str) -> Result<Self, MergeError> {
        serde_json::from_str(json)
            .map_err(|e| MergeError::InvalidSettings(format!("failed to parse outro/intro settings: {}", e)))
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        for (name, value) in [
            ("outro fade start", self.outro_fade_start_secs),
            ("intro start delay", self.intro_start_delay_secs),
            ("intro volume", self.intro_volume),
            ("main volume", self.main_volume),
            ("fade-to volume", self.fade_to_volume),
            ("extra fade time", self.extra_fade_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MergeError::InvalidSettings(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }

    /// Seconds before the main track's end where the outro fade starts.
    ///
    /// Without `auto_fade_from_intro` (the default) this is exactly
    /// `outro_fade_start_secs`. Auto fading is an extension of this crate and
    /// has no legacy counterpart: the fade then covers the part of the intro
    /// that overlaps the main track plus `extra_fade_secs`.
    pub fn effective_fade_start_secs(&self, intro_duration_secs: f64) -> f64 {
        if self.auto_fade_from_intro {
            let overlap = intro_duration_secs.min(self.intro_start_delay_secs as f64);
            overlap + self.extra_fade_secs as f64
        } else {
            self.outro_fade_start_secs as f64
        }
    }
}

impl Default for OutroIntroSettings {
    fn default() -> Self {
        Self {
            outro_fade_start_secs: 20.0,
            intro_start_delay_secs: 15.0,
            intro_volume: 1.0,
            main_volume: 1.0,
            fade_to_volume: 0.0,
            fade_curve: FadeCurve::Linear,
            auto_fade_from_intro: false,
            extra_fade_secs: 7.0,
        }
    }
}
