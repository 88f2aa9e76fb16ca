//! # audio-merge-core
//!
//! Offline audio track merging core library.
//!
//! Decodes PCM WAV files, trims and scales them, joins them with a crossfade,
//! a silence gap, or an outro/intro overlay, and writes 16-bit mono 44.1 kHz
//! WAV output. `AudioMerger` runs the file-to-file pipeline; the processing
//! stages are plain functions over `AudioTrack` buffers and can be used on
//! their own.
//!
//! ## Architecture
//!
//! ```text
//! audio-merge-core (this crate)
//! ├── traits/       ← MergeDelegate
//! ├── models/       ← MergeError, MergeStage, MixSettings, MixProfile, AudioTrack, etc.
//! ├── processing/   ← WAV header codec, FadeCurve, track prep, CrossfadeMixer, OutroIntroMixer, silence
//! ├── session/      ← AudioMerger (file-to-file orchestrator)
//! └── storage/      ← WAV reader/writer, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioTrack, TARGET_SAMPLE_RATE};
pub use models::error::MergeError;
pub use models::merge_result::{MergeKind, MergeMetadata, MergeResult};
pub use models::profile::MixProfile;
pub use models::settings::{MixSettings, OutroIntroSettings, TrimWindow};
pub use models::state::MergeStage;
pub use processing::crossfade_mixer::CrossfadeMixer;
pub use processing::fade_curve::FadeCurve;
pub use processing::outro_intro_mixer::OutroIntroMixer;
pub use processing::silence::append_after_trailing_silence;
pub use processing::track_prep::prepare_track;
pub use session::merger::AudioMerger;
pub use storage::wav_reader::decode;
pub use storage::wav_writer::encode;
pub use traits::merge_delegate::MergeDelegate;
