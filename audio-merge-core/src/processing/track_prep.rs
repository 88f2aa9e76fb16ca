use crate::models::audio_models::AudioTrack;
use crate::models::settings::TrimWindow;

/// Trim `track` to `window` and scale every kept sample by `gain`.
///
/// Times become indices via `round(time * sample_rate)`. Both indices are
/// clamped into the track and the start never passes the end, so any window
/// is accepted; an out-of-range one simply yields an empty track.
pub fn prepare_track(track: AudioTrack, window: &TrimWindow, gain: f32, sample_rate: u32) -> AudioTrack {
    let len = track.len();
    let end = match window.end() {
        Some(end_secs) => time_to_index(end_secs, sample_rate).min(len),
        None => len,
    };
    let start = time_to_index(window.start_secs, sample_rate).min(end);

    log::debug!("trim [{}, {}) of {} samples, gain {}", start, end, len, gain);

    let mut samples = track.into_samples();
    samples.truncate(end);
    samples.drain(..start);
    apply_gain(&mut samples, gain);
    AudioTrack::new(samples)
}

/// Scale a whole track by `gain`.
pub fn scale_track(track: AudioTrack, gain: f32) -> AudioTrack {
    let mut samples = track.into_samples();
    apply_gain(&mut samples, gain);
    AudioTrack::new(samples)
}

fn apply_gain(samples: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
}

fn time_to_index(secs: f32, sample_rate: u32) -> usize {
    crate::models::audio_models::seconds_to_samples(secs as f64, sample_rate)
}
