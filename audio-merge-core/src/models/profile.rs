use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::MergeError;
use super::settings::{MixSettings, TrimWindow};
use crate::processing::fade_curve::FadeCurve;

/// Named mix presets.
///
/// `settings()` is a pure lookup; nothing here touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixProfile {
    Manual,
    DjCrossfade,
    RadioStyle,
    SmoothBlend,
    QuickCut,
    LongFade,
    OverlapMix,
    Gapless,
}

impl MixProfile {
    pub const ALL: [MixProfile; 8] = [
        MixProfile::Manual,
        MixProfile::DjCrossfade,
        MixProfile::RadioStyle,
        MixProfile::SmoothBlend,
        MixProfile::QuickCut,
        MixProfile::LongFade,
        MixProfile::OverlapMix,
        MixProfile::Gapless,
    ];

    /// Fully populated settings for this profile.
    ///
    /// Several presets carry negative gaps; any non-positive gap means no
    /// silence is inserted.
    pub fn settings(self) -> MixSettings {
        match self {
            MixProfile::Manual => MixSettings::default(),
            MixProfile::DjCrossfade => preset(8.0, 0.0, 1.0, -3.0, FadeCurve::Exponential),
            MixProfile::RadioStyle => preset(0.0, 1.0, 1.0, 2.0, FadeCurve::Linear),
            MixProfile::SmoothBlend => preset(12.0, 0.3, 1.0, -6.0, FadeCurve::Logarithmic),
            MixProfile::QuickCut => preset(2.0, 0.0, 1.0, -10.0, FadeCurve::Linear),
            MixProfile::LongFade => preset(20.0, 0.0, 1.0, -15.0, FadeCurve::Logarithmic),
            MixProfile::OverlapMix => preset(15.0, 0.5, 0.8, -15.0, FadeCurve::Linear),
            MixProfile::Gapless => preset(0.0, 1.0, 1.0, 0.0, FadeCurve::Linear),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MixProfile::Manual => "manual",
            MixProfile::DjCrossfade => "dj_crossfade",
            MixProfile::RadioStyle => "radio_style",
            MixProfile::SmoothBlend => "smooth_blend",
            MixProfile::QuickCut => "quick_cut",
            MixProfile::LongFade => "long_fade",
            MixProfile::OverlapMix => "overlap_mix",
            MixProfile::Gapless => "gapless",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MixProfile::Manual => "Manual settings - customize all parameters",
            MixProfile::DjCrossfade => "DJ-style crossfade with exponential curve",
            MixProfile::RadioStyle => "Radio-style with 2-second gap, no crossfade",
            MixProfile::SmoothBlend => "Smooth logarithmic blend with partial volumes",
            MixProfile::QuickCut => "Quick 2-second crossfade",
            MixProfile::LongFade => "Long 20-second fade for ambient music",
            MixProfile::OverlapMix => "Both songs audible during long overlap",
            MixProfile::Gapless => "No gap, no crossfade - direct connection",
        }
    }
}

/// Symmetric preset: both tracks share the floor and gain, no trimming.
fn preset(crossfade_secs: f32, min_volume: f32, volume: f32, gap_secs: f32, fade_curve: FadeCurve) -> MixSettings {
    MixSettings {
        crossfade_secs,
        song1_min_volume: min_volume,
        song2_min_volume: min_volume,
        song1_volume: volume,
        song2_volume: volume,
        song1_trim: TrimWindow::FULL,
        song2_trim: TrimWindow::FULL,
        gap_secs,
        fade_curve,
    }
}

impl fmt::Display for MixProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MixProfile {
    type Err = MergeError;

    /// Accepts the tag name in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        MixProfile::ALL
            .into_iter()
            .find(|profile| profile.name() == normalized)
            .ok_or_else(|| MergeError::InvalidSettings(format!("unknown mix profile: {s}")))
    }
}
