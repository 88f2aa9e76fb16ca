use crate::models::error::MergeError;
use crate::models::merge_result::MergeResult;
use crate::models::state::MergeStage;

/// Event delegate for merge notifications.
///
/// Methods are called synchronously from the thread running the merge.
pub trait MergeDelegate: Send + Sync {
    /// Called when the merge moves to a new stage.
    fn on_stage_changed(&self, stage: &MergeStage);

    /// Called when a merge fails, before the error is returned.
    fn on_error(&self, error: &MergeError);

    /// Called when the output file is finalized.
    fn on_merge_finished(&self, result: &MergeResult);
}
