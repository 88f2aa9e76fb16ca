use std::path::Path;
use std::sync::Arc;

use crate::models::audio_models::{AudioTrack, TARGET_SAMPLE_RATE};
use crate::models::error::MergeError;
use crate::models::merge_result::{MergeKind, MergeMetadata, MergeResult};
use crate::models::profile::MixProfile;
use crate::models::settings::{MixSettings, OutroIntroSettings};
use crate::models::state::MergeStage;
use crate::processing::crossfade_mixer::CrossfadeMixer;
use crate::processing::outro_intro_mixer::OutroIntroMixer;
use crate::processing::silence;
use crate::processing::track_prep::prepare_track;
use crate::storage::{metadata, wav_reader, wav_writer};
use crate::traits::merge_delegate::MergeDelegate;

/// File-to-file merge orchestrator.
///
/// Each call runs one full pipeline and owns its buffers from decode to
/// encode:
/// ```text
/// [decode A] ─┐
///             ├→ [prepare] → [mix] → [encode] → MergeResult
/// [decode B] ─┘
/// ```
/// Errors propagate unchanged. A failed encode may leave a partial output
/// file behind; removing it is up to the caller.
pub struct AudioMerger {
    crossfade_mixer: CrossfadeMixer,
    outro_intro_mixer: OutroIntroMixer,
    delegate: Option<Arc<dyn MergeDelegate>>,
    write_metadata_sidecar: bool,
    stage: MergeStage,
}

impl AudioMerger {
    pub fn new() -> Self {
        Self {
            crossfade_mixer: CrossfadeMixer::new(TARGET_SAMPLE_RATE),
            outro_intro_mixer: OutroIntroMixer::new(TARGET_SAMPLE_RATE),
            delegate: None,
            write_metadata_sidecar: false,
            stage: MergeStage::Idle,
        }
    }

    /// Also write `<output>.metadata.json` after each successful merge.
    pub fn with_metadata_sidecar(mut self, enabled: bool) -> Self {
        self.write_metadata_sidecar = enabled;
        self
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn MergeDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Stage of the most recent merge.
    pub fn stage(&self) -> &MergeStage {
        &self.stage
    }

    /// Trim, gain, and join two files with a crossfade or gap.
    pub fn merge_files(
        &mut self,
        first: &Path,
        second: &Path,
        output: &Path,
        settings: &MixSettings,
    ) -> Result<MergeResult, MergeError> {
        self.run(None, |merger| merger.crossfade(first, second, output, settings))
    }

    /// Merge with a named profile's settings.
    pub fn merge_with_profile(
        &mut self,
        first: &Path,
        second: &Path,
        output: &Path,
        profile: MixProfile,
    ) -> Result<MergeResult, MergeError> {
        log::info!("using profile {}: {}", profile, profile.description());
        let settings = profile.settings();
        self.run(Some(profile), |merger| merger.crossfade(first, second, output, &settings))
    }

    /// Fade out `main` and layer `intro` over its tail.
    pub fn merge_outro_intro(
        &mut self,
        main: &Path,
        intro: &Path,
        output: &Path,
        settings: &OutroIntroSettings,
    ) -> Result<MergeResult, MergeError> {
        self.run(None, |merger| {
            log::info!(
                "outro/intro {} + {} → {} (fade {}s before end to {}, intro {}s before end)",
                main.display(),
                intro.display(),
                output.display(),
                settings.outro_fade_start_secs,
                settings.fade_to_volume,
                settings.intro_start_delay_secs
            );
            merger.set_stage(MergeStage::Decoding);
            let main_track = wav_reader::decode(main)?.track;
            let intro_track = wav_reader::decode(intro)?.track;

            merger.set_stage(MergeStage::Mixing);
            let mixed = merger.outro_intro_mixer.mix(main_track, intro_track, settings);

            merger.finish(MergeKind::OutroIntro, &[main, intro], output, mixed)
        })
    }

    /// Append `next` to an existing mix after dropping the mix's trailing silence.
    pub fn append_track(&mut self, existing: &Path, next: &Path, output: &Path) -> Result<MergeResult, MergeError> {
        self.run(None, |merger| {
            log::info!("appending {} to {} → {}", next.display(), existing.display(), output.display());
            merger.set_stage(MergeStage::Decoding);
            let mix = wav_reader::decode(existing)?.track;
            let next_track = wav_reader::decode(next)?.track;

            merger.set_stage(MergeStage::Mixing);
            let joined = silence::append_after_trailing_silence(mix, next_track);

            merger.finish(MergeKind::Append, &[existing, next], output, joined)
        })
    }

    // --- Internal helpers ---

    fn crossfade(
        &mut self,
        first: &Path,
        second: &Path,
        output: &Path,
        settings: &MixSettings,
    ) -> Result<MergeResult, MergeError> {
        log::info!(
            "merging {} + {} → {} (crossfade {}s, gap {}s, {})",
            first.display(),
            second.display(),
            output.display(),
            settings.crossfade_secs,
            settings.gap_secs,
            settings.fade_curve.name()
        );
        self.set_stage(MergeStage::Decoding);
        let track1 = wav_reader::decode(first)?.track;
        let track2 = wav_reader::decode(second)?.track;

        self.set_stage(MergeStage::Preparing);
        let track1 = prepare_track(track1, &settings.song1_trim, settings.song1_volume, TARGET_SAMPLE_RATE);
        let track2 = prepare_track(track2, &settings.song2_trim, settings.song2_volume, TARGET_SAMPLE_RATE);

        self.set_stage(MergeStage::Mixing);
        let mixed = self.crossfade_mixer.mix(track1, track2, settings);

        self.finish(MergeKind::Crossfade, &[first, second], output, mixed)
    }

    /// Run one pipeline, recording the terminal stage and notifying the delegate.
    fn run<F>(&mut self, profile: Option<MixProfile>, pipeline: F) -> Result<MergeResult, MergeError>
    where
        F: FnOnce(&mut Self) -> Result<MergeResult, MergeError>,
    {
        let outcome = pipeline(self).and_then(|mut result| {
            result.metadata.profile = profile.map(|p| p.name().to_string());
            if self.write_metadata_sidecar {
                metadata::write_metadata(&result.metadata, &result.output_path)?;
            }
            Ok(result)
        });

        match outcome {
            Ok(result) => {
                log::info!(
                    "wrote {} ({} samples, {:.2}s)",
                    result.output_path.display(),
                    result.sample_count,
                    result.duration_secs
                );
                self.set_stage(MergeStage::Completed(Box::new(result.clone())));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_merge_finished(&result);
                }
                Ok(result)
            }
            Err(e) => {
                log::error!("merge failed: {}", e);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&e);
                }
                self.set_stage(MergeStage::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Encode the mixed track and build the result.
    fn finish(
        &mut self,
        kind: MergeKind,
        sources: &[&Path],
        output: &Path,
        mixed: AudioTrack,
    ) -> Result<MergeResult, MergeError> {
        self.set_stage(MergeStage::Encoding);
        let peak_level = mixed.peak_level();
        let duration_secs = mixed.duration_secs(TARGET_SAMPLE_RATE);
        let sample_count = mixed.len();

        let summary = wav_writer::encode(mixed.samples(), output)?;

        let metadata = MergeMetadata::new(
            kind,
            sources.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
            &output.to_string_lossy(),
            duration_secs,
            sample_count,
            peak_level,
            summary.clamped_samples,
            &summary.checksum,
        );

        Ok(MergeResult {
            output_path: output.to_path_buf(),
            duration_secs,
            sample_count,
            checksum: summary.checksum,
            metadata,
        })
    }

    fn set_stage(&mut self, stage: MergeStage) {
        log::debug!("merge stage: {}", stage.name());
        if let Some(ref delegate) = self.delegate {
            delegate.on_stage_changed(&stage);
        }
        self.stage = stage;
    }
}

impl Default for AudioMerger {
    fn default() -> Self {
        Self::new()
    }
}
