use crate::models::audio_models::{seconds_to_samples, AudioTrack, TARGET_SAMPLE_RATE};
use crate::models::settings::OutroIntroSettings;
use crate::processing::fade_curve::FadeCurve;
use crate::processing::track_prep::scale_track;

/// Fades out the tail of a main track and layers an intro over it.
///
/// ```text
/// main:  ──────────────────────╲╲╲╲╲╲╲╲╲╲
///                              ^ fade start
/// intro:                            ▓▓▓▓▓▓▓▓▓▓▓▓▓▓
///                                   ^ intro start
/// ```
///
/// Where the two overlap the samples are summed and hard-clipped to
/// `[-1.0, 1.0]`; intro samples past the end of the main track are appended.
#[derive(Debug, Clone)]
pub struct OutroIntroMixer {
    pub sample_rate: u32,
}

impl OutroIntroMixer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn mix(&self, main: AudioTrack, intro: AudioTrack, settings: &OutroIntroSettings) -> AudioTrack {
        let intro_duration = intro.duration_secs(self.sample_rate);
        let main = scale_track(main, settings.main_volume);
        let intro = scale_track(intro, settings.intro_volume);

        let len = main.len();
        let fade_start_secs = settings.effective_fade_start_secs(intro_duration);
        let fade_start = self.fade_start_index(len, fade_start_secs);
        let intro_start = len.saturating_sub(seconds_to_samples(
            settings.intro_start_delay_secs as f64,
            self.sample_rate,
        ));

        log::debug!(
            "outro/intro: main {} samples, fade from {}, intro {} samples from {}",
            len,
            fade_start,
            intro.len(),
            intro_start
        );

        let mut output = main.into_samples();
        apply_outro_fade(&mut output[fade_start..], settings.fade_to_volume, settings.fade_curve);

        let incoming = intro.into_samples();
        let overlap = (output.len() - intro_start).min(incoming.len());
        for (existing, &sample) in output[intro_start..intro_start + overlap].iter_mut().zip(&incoming) {
            *existing = (*existing + sample).clamp(-1.0, 1.0);
        }
        output.extend_from_slice(&incoming[overlap..]);

        AudioTrack::new(output)
    }

    /// `round((len / rate − secs_before_end) · rate)` clamped into `[0, len]`.
    fn fade_start_index(&self, len: usize, secs_before_end: f64) -> usize {
        let rate = self.sample_rate as f64;
        let start = ((len as f64 / rate - secs_before_end) * rate).round();
        if start.is_nan() || start <= 0.0 {
            0
        } else {
            (start as usize).min(len)
        }
    }
}

impl Default for OutroIntroMixer {
    fn default() -> Self {
        Self::new(TARGET_SAMPLE_RATE)
    }
}

/// Fade `region` from full volume toward `fade_to_volume`.
///
/// The first sample keeps full volume; the ramp is `1 − curve(p)·(1 − fade_to)`
/// with `p = i / region.len()`.
fn apply_outro_fade(region: &mut [f32], fade_to_volume: f32, curve: FadeCurve) {
    let fade_length = region.len();
    for (i, sample) in region.iter_mut().enumerate() {
        let progress = curve.adjust(i as f32 / fade_length as f32);
        *sample *= 1.0 - progress * (1.0 - fade_to_volume);
    }
}
