use super::error::MergeError;
use super::merge_result::MergeResult;

/// Progress of a single merge run.
///
/// ```text
/// idle → decoding → preparing → mixing → encoding → completed
///           ↓           ↓          ↓         ↓
///           └───────────┴──────────┴─────────┴────→ failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MergeStage {
    Idle,
    Decoding,
    Preparing,
    Mixing,
    Encoding,
    Completed(Box<MergeResult>),
    Failed(MergeError),
}

impl MergeStage {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Decoding => "decoding",
            Self::Preparing => "preparing",
            Self::Mixing => "mixing",
            Self::Encoding => "encoding",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}
