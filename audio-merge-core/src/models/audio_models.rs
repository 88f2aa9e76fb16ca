/// Sample rate every stage assumes and every encoded file declares.
pub const TARGET_SAMPLE_RATE: u32 = 44100;

/// A mono sequence of normalized samples.
///
/// Samples are nominally in `[-1.0, 1.0]`; additive mixing can push them past
/// that range until a clipping stage or the encoder clamps them. The sample
/// rate is implicit (see [`TARGET_SAMPLE_RATE`]) and the channel count is
/// always one.
///
/// Stages take tracks by value and hand back new ones, so a buffer is only
/// ever owned by the stage currently working on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioTrack {
    samples: Vec<f32>,
}

impl AudioTrack {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// A track of `len` zero samples.
    pub fn silence(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds at `sample_rate`.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / sample_rate as f64
    }

    /// Peak absolute level.
    pub fn peak_level(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    /// RMS level (0.0–1.0 for normalized audio).
    pub fn rms_level(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f32).sqrt()
    }
}

impl From<Vec<f32>> for AudioTrack {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// Convert a duration to a sample count, rounding to the nearest sample.
///
/// Negative and non-finite durations yield zero.
pub fn seconds_to_samples(secs: f64, sample_rate: u32) -> usize {
    let samples = (secs * sample_rate as f64).round();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}
