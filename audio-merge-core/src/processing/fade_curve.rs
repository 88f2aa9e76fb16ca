use serde::{Deserialize, Serialize};

/// Shape of a fade or crossfade transition.
///
/// Each curve maps progress in `[0, 1]` to adjusted progress in `[0, 1]`,
/// is monotonically non-decreasing, and fixes both endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeCurve {
    #[default]
    Linear,
    /// Slow start, fast finish.
    Exponential,
    /// Fast start, slow finish.
    Logarithmic,
}

impl FadeCurve {
    /// Map a legacy integer code: `1` exponential, `-1` logarithmic,
    /// anything else linear.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => FadeCurve::Exponential,
            -1 => FadeCurve::Logarithmic,
            _ => FadeCurve::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::Exponential => "Exponential",
            FadeCurve::Logarithmic => "Logarithmic",
        }
    }

    /// Adjust transition progress. Out-of-range input is clamped to `[0, 1]`.
    #[inline]
    pub fn adjust(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => p,
            FadeCurve::Exponential => p * p,
            FadeCurve::Logarithmic => p.sqrt(),
        }
    }
}
