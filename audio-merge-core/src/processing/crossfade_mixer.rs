use crate::models::audio_models::{seconds_to_samples, AudioTrack, TARGET_SAMPLE_RATE};
use crate::models::settings::MixSettings;

/// Joins two prepared tracks with a silence gap, a crossfade, or a plain
/// concatenation.
///
/// The crossfade overwrites the last `fade_length` samples of the first track
/// with a weighted sum of both tracks: the first decays from 1.0 toward
/// `song1_min_volume` while the second rises from `song2_min_volume` to 1.0.
/// The sum is not clipped; complementary floors keep it near unity and the
/// encoder clamps whatever is left.
#[derive(Debug, Clone)]
pub struct CrossfadeMixer {
    pub sample_rate: u32,
}

impl CrossfadeMixer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Mix `second` onto the end of `first`.
    ///
    /// Gain and trimming must already be applied. A positive gap always wins
    /// over the crossfade.
    pub fn mix(&self, first: AudioTrack, second: AudioTrack, settings: &MixSettings) -> AudioTrack {
        let mut output = first.into_samples();
        let incoming = second.into_samples();

        // A sub-sample gap adds no silence but still disables the crossfade.
        let (gap_samples, fade_length) = if settings.has_gap() {
            let gap_samples = seconds_to_samples(settings.gap_secs as f64, self.sample_rate);
            output.resize(output.len() + gap_samples, 0.0);
            (gap_samples, 0)
        } else {
            (0, seconds_to_samples(settings.crossfade_secs as f64, self.sample_rate))
        };

        let overlap_start = output.len().saturating_sub(fade_length);
        // Shorter than `fade_length` when either track is too short to cover it.
        let blend_length = fade_length.min(incoming.len()).min(output.len() - overlap_start);

        log::debug!(
            "crossfade: gap {} samples, fade {} samples, blending {} samples from index {}",
            gap_samples,
            fade_length,
            blend_length,
            overlap_start
        );

        let curve = settings.fade_curve;
        for (i, (existing, &sample)) in output[overlap_start..overlap_start + blend_length]
            .iter_mut()
            .zip(&incoming[..blend_length])
            .enumerate()
        {
            let progress = curve.adjust(i as f32 / fade_length as f32);
            let outgoing_volume = 1.0 - progress * (1.0 - settings.song1_min_volume);
            let incoming_volume = settings.song2_min_volume + progress * (1.0 - settings.song2_min_volume);
            *existing = *existing * outgoing_volume + sample * incoming_volume;
        }

        output.extend_from_slice(&incoming[blend_length..]);
        AudioTrack::new(output)
    }
}

impl Default for CrossfadeMixer {
    fn default() -> Self {
        Self::new(TARGET_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fade_curve::FadeCurve;
    use approx::assert_relative_eq;

    fn settings(crossfade_secs: f32, gap_secs: f32) -> MixSettings {
        MixSettings {
            crossfade_secs,
            gap_secs,
            ..Default::default()
        }
    }

    fn track(samples: &[f32]) -> AudioTrack {
        AudioTrack::new(samples.to_vec())
    }

    #[test]
    fn constant_tracks_crossfade_to_unity() {
        let mixer = CrossfadeMixer::new(10);
        let a = track(&[1.0; 10]);
        let b = track(&[1.0; 10]);

        let mixed = mixer.mix(a, b, &settings(0.5, 0.0));

        assert_eq!(mixed.len(), 15);
        for sample in mixed.samples() {
            assert_relative_eq!(*sample, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn crossfade_weights_follow_the_curve() {
        let mixer = CrossfadeMixer::new(10);
        // silent outgoing track isolates the incoming weight
        let a = track(&[0.0; 10]);
        let b = track(&[1.0; 10]);

        let linear = mixer.mix(a.clone(), b.clone(), &settings(0.5, 0.0));
        let expected = [0.0, 0.2, 0.4, 0.6, 0.8];
        for (sample, want) in linear.samples()[5..10].iter().zip(expected) {
            assert_relative_eq!(*sample, want, epsilon = 1e-6);
        }

        let exponential = MixSettings {
            fade_curve: FadeCurve::Exponential,
            ..settings(0.5, 0.0)
        };
        let mixed = mixer.mix(a, b, &exponential);
        let expected = [0.0, 0.04, 0.16, 0.36, 0.64];
        for (sample, want) in mixed.samples()[5..10].iter().zip(expected) {
            assert_relative_eq!(*sample, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn outgoing_track_decays_toward_its_floor() {
        let mixer = CrossfadeMixer::new(10);
        let a = track(&[1.0; 4]);
        let b = track(&[0.0; 4]);
        let floors = MixSettings {
            song1_min_volume: 0.5,
            ..settings(0.4, 0.0)
        };

        let mixed = mixer.mix(a, b, &floors);

        // progress 0, .25, .5, .75 → 1 - p * 0.5
        let expected = [1.0, 0.875, 0.75, 0.625];
        assert_eq!(mixed.len(), 4);
        for (sample, want) in mixed.samples().iter().zip(expected) {
            assert_relative_eq!(*sample, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn overlapping_floors_can_exceed_unity() {
        let mixer = CrossfadeMixer::new(10);
        let both_audible = MixSettings {
            song1_min_volume: 1.0,
            song2_min_volume: 1.0,
            ..settings(0.2, 0.0)
        };

        let mixed = mixer.mix(track(&[0.8; 2]), track(&[0.8; 2]), &both_audible);

        assert_eq!(mixed.len(), 2);
        assert_relative_eq!(mixed.samples()[0], 1.6, epsilon = 1e-6);
    }

    #[test]
    fn zero_crossfade_is_concatenation() {
        let mixer = CrossfadeMixer::new(44100);
        let a = [0.1, -0.2, 0.3];
        let b = [0.4, 0.5];

        let mixed = mixer.mix(track(&a), track(&b), &settings(0.0, 0.0));

        assert_eq!(mixed.samples(), &[0.1, -0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn gap_wins_over_crossfade() {
        let mixer = CrossfadeMixer::new(10);
        let a = [0.5, 0.5];
        let b = [0.25, 0.25];

        let mixed = mixer.mix(track(&a), track(&b), &settings(5.0, 0.3));

        assert_eq!(mixed.samples(), &[0.5, 0.5, 0.0, 0.0, 0.0, 0.25, 0.25]);
    }

    #[test]
    fn sub_sample_gap_still_disables_crossfade() {
        let mixer = CrossfadeMixer::new(10);
        let a = [0.5, 0.5, 0.5, 0.5];
        let b = [0.25, 0.25, 0.25, 0.25];

        // 0.01s at 10 Hz rounds to zero samples of silence
        let mixed = mixer.mix(track(&a), track(&b), &settings(0.2, 0.01));

        assert_eq!(mixed.samples(), &[0.5, 0.5, 0.5, 0.5, 0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn negative_gap_leaves_crossfade_active() {
        let mixer = CrossfadeMixer::new(10);
        let mixed = mixer.mix(track(&[1.0; 4]), track(&[1.0; 4]), &settings(0.2, -3.0));
        assert_eq!(mixed.len(), 6);
    }

    #[test]
    fn fade_longer_than_first_track_overlaps_from_the_start() {
        let mixer = CrossfadeMixer::new(10);
        let a = track(&[1.0, 1.0]);
        let b = track(&[0.0; 6]);

        let mixed = mixer.mix(a, b, &settings(1.0, 0.0));

        // fade length 10, overlap starts at 0 and covers only the 2 existing samples
        assert_eq!(mixed.len(), 6);
        assert_relative_eq!(mixed.samples()[0], 1.0);
        assert_relative_eq!(mixed.samples()[1], 0.9, epsilon = 1e-6);
        assert_eq!(&mixed.samples()[2..], &[0.0; 4]);
    }

    #[test]
    fn fade_longer_than_second_track_blends_only_what_exists() {
        let mixer = CrossfadeMixer::new(10);
        let a = track(&[1.0; 6]);
        let b = track(&[1.0; 2]);

        let mixed = mixer.mix(a, b, &settings(0.4, 0.0));

        // overlap starts at index 2; only two incoming samples to blend
        assert_eq!(mixed.len(), 6);
        assert_relative_eq!(mixed.samples()[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(mixed.samples()[3], 1.0, epsilon = 1e-6);
        // the rest of the first track is left as it was
        assert_eq!(&mixed.samples()[4..], &[1.0, 1.0]);
    }

    #[test]
    fn empty_inputs() {
        let mixer = CrossfadeMixer::default();
        assert!(mixer
            .mix(AudioTrack::default(), AudioTrack::default(), &MixSettings::default())
            .is_empty());

        let only_second = mixer.mix(AudioTrack::default(), track(&[0.3]), &MixSettings::default());
        assert_eq!(only_second.samples(), &[0.3]);
    }
}
