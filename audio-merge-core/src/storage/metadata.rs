use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::MergeError;
use crate::models::merge_result::MergeMetadata;

/// Sidecar path for an output file: `{output}.metadata.json`.
pub fn metadata_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_owned();
    name.push(".metadata.json");
    PathBuf::from(name)
}

/// Write merge metadata as a JSON sidecar next to the output file.
pub fn write_metadata(metadata: &MergeMetadata, output_path: &Path) -> Result<PathBuf, MergeError> {
    let path = metadata_path(output_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| MergeError::MetadataFailed(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| MergeError::from_io(e, "failed to write metadata", &path))?;
    Ok(path)
}

/// Read merge metadata from the JSON sidecar of `output_path`.
pub fn read_metadata(output_path: &Path) -> Result<MergeMetadata, MergeError> {
    let path = metadata_path(output_path);
    let json = fs::read_to_string(&path).map_err(|e| MergeError::from_io(e, "failed to read metadata", &path))?;
    serde_json::from_str(&json).map_err(|e| MergeError::MetadataFailed(format!("failed to parse metadata: {}", e)))
}
