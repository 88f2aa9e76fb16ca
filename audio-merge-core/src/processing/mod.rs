pub mod crossfade_mixer;
pub mod fade_curve;
pub mod outro_intro_mixer;
pub mod silence;
pub mod track_prep;
pub mod wav_format;
