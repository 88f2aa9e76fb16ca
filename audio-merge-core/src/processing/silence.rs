use crate::models::audio_models::AudioTrack;

/// Samples at or below this absolute level count as silence.
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// Drop trailing near-silence from `track`.
///
/// Everything after the last sample louder than [`SILENCE_THRESHOLD`] is
/// removed. A track with no such sample becomes empty.
pub fn trim_trailing_silence(track: AudioTrack) -> AudioTrack {
    let mut samples = track.into_samples();
    let keep = samples
        .iter()
        .rposition(|s| s.abs() > SILENCE_THRESHOLD)
        .map_or(0, |last| last + 1);
    if keep < samples.len() {
        log::debug!("trimming {} trailing silent samples", samples.len() - keep);
    }
    samples.truncate(keep);
    AudioTrack::new(samples)
}

/// Strip trailing silence from `existing` and append `next` verbatim.
///
/// No fade, gain, or gap is applied to either side of the join.
pub fn append_after_trailing_silence(existing: AudioTrack, next: AudioTrack) -> AudioTrack {
    let mut samples = trim_trailing_silence(existing).into_samples();
    samples.extend(next.into_samples());
    AudioTrack::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_after_last_audible_sample() {
        let mix = AudioTrack::new(vec![0.5, 0.02, 0.001, 0.0]);
        let next = AudioTrack::new(vec![0.7, -0.7]);

        let joined = append_after_trailing_silence(mix, next);

        assert_eq!(joined.samples(), &[0.5, 0.02, 0.7, -0.7]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let trimmed = trim_trailing_silence(AudioTrack::new(vec![0.3, 0.01, -0.01]));
        assert_eq!(trimmed.samples(), &[0.3]);
    }

    #[test]
    fn negative_samples_count_by_magnitude() {
        let trimmed = trim_trailing_silence(AudioTrack::new(vec![0.0, -0.5, 0.005]));
        assert_eq!(trimmed.samples(), &[0.0, -0.5]);
    }

    #[test]
    fn all_silent_mix_is_discarded() {
        let mix = AudioTrack::new(vec![0.001, 0.0, -0.009]);
        let joined = append_after_trailing_silence(mix, AudioTrack::new(vec![0.4]));
        assert_eq!(joined.samples(), &[0.4]);
    }

    #[test]
    fn next_track_is_not_trimmed() {
        let joined = append_after_trailing_silence(
            AudioTrack::new(vec![0.9]),
            AudioTrack::new(vec![0.0, 0.2, 0.0]),
        );
        assert_eq!(joined.samples(), &[0.9, 0.0, 0.2, 0.0]);
    }

    #[test]
    fn empty_inputs() {
        assert!(append_after_trailing_silence(AudioTrack::default(), AudioTrack::default()).is_empty());
    }
}
