use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which pipeline produced an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeKind {
    Crossfade,
    OutroIntro,
    Append,
}

/// Result returned when a merge completes successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub output_path: PathBuf,
    pub duration_secs: f64,
    pub sample_count: usize,
    pub checksum: String,
    pub metadata: MergeMetadata,
}

/// Metadata describing a merged file.
///
/// Serializable for the optional JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeMetadata {
    pub id: String,
    pub kind: MergeKind,
    pub sources: Vec<String>,
    pub output_path: String,
    pub duration_secs: f64,
    pub sample_count: usize,
    /// Peak absolute level of the mix before 16-bit conversion.
    pub peak_level: f32,
    /// Samples that had to be clamped to fit 16-bit PCM.
    pub clamped_samples: u64,
    pub checksum: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl MergeMetadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: MergeKind,
        sources: Vec<String>,
        output_path: &str,
        duration_secs: f64,
        sample_count: usize,
        peak_level: f32,
        clamped_samples: u64,
        checksum: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            sources,
            output_path: output_path.to_string(),
            duration_secs,
            sample_count,
            peak_level,
            clamped_samples,
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            profile: None,
        }
    }
}
