use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::MergeError;
use crate::processing::wav_format::{WavHeader, MAX_OUTPUT_SAMPLES, WAV_HEADER_SIZE};

/// What was written by a finished [`WavFileWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    /// SHA-256 hex digest of the complete file.
    pub checksum: String,
    pub sample_count: u64,
    /// Samples outside the 16-bit range that were clamped.
    pub clamped_samples: u64,
}

/// Streaming writer for mono 16-bit 44.1 kHz PCM WAV files.
///
/// ```text
/// [44-byte WAV header, sizes patched on close]
/// [little-endian i16 samples...]
/// ```
///
/// A failure partway through leaves whatever was already written on disk.
pub struct WavFileWriter {
    file_path: PathBuf,
    file: Option<BufWriter<File>>,
    samples_written: u64,
    clamped_samples: u64,
}

impl WavFileWriter {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            file: None,
            samples_written: 0,
            clamped_samples: 0,
        }
    }

    /// Create the file (and any missing parent directories) and write a
    /// placeholder header.
    pub fn open(&mut self) -> Result<(), MergeError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MergeError::from_io(e, "failed to create directory", parent))?;
        }

        let file =
            File::create(&self.file_path).map_err(|e| MergeError::from_io(e, "failed to create", &self.file_path))?;
        let placeholder = WavHeader::output(0)?.to_bytes();
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&placeholder)
            .map_err(|e| MergeError::from_io(e, "failed to write header to", &self.file_path))?;

        self.file = Some(writer);
        self.samples_written = 0;
        self.clamped_samples = 0;
        Ok(())
    }

    /// Convert and append samples.
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<(), MergeError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| MergeError::IoFailure("file is not open for writing".into()))?;

        if self.samples_written + samples.len() as u64 > MAX_OUTPUT_SAMPLES {
            return Err(MergeError::IoFailure(format!(
                "{} samples exceed the WAV size limit",
                self.samples_written + samples.len() as u64
            )));
        }

        let mut data = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            let (value, clamped) = sample_to_pcm16(sample);
            if clamped {
                self.clamped_samples += 1;
            }
            data.extend_from_slice(&value.to_le_bytes());
        }
        file.write_all(&data)
            .map_err(|e| MergeError::from_io(e, "write failed for", &self.file_path))?;
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    /// Patch the header sizes, flush, and checksum the finished file.
    pub fn close(&mut self) -> Result<EncodeSummary, MergeError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| MergeError::IoFailure("file is not open".into()))?;

        let header = WavHeader::output(self.samples_written as usize)?;
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(&header.to_bytes()))
            .and_then(|_| file.flush())
            .map_err(|e| MergeError::from_io(e, "failed to finalize", &self.file_path))?;
        drop(file);

        if self.clamped_samples > 0 {
            log::warn!(
                "{} of {} samples exceeded full scale and were clamped",
                self.clamped_samples,
                self.samples_written
            );
        }

        let checksum = sha256_file(&self.file_path)?;
        Ok(EncodeSummary {
            checksum,
            sample_count: self.samples_written,
            clamped_samples: self.clamped_samples,
        })
    }

    /// Total bytes written so far, including the header.
    pub fn bytes_written(&self) -> u64 {
        WAV_HEADER_SIZE as u64 + self.samples_written * 2
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Write `samples` to `path` as mono 16-bit 44.1 kHz PCM.
pub fn encode(samples: &[f32], path: &Path) -> Result<EncodeSummary, MergeError> {
    let mut writer = WavFileWriter::new(path.to_path_buf());
    writer.open()?;
    writer.write_samples(samples)?;
    let summary = writer.close()?;
    log::debug!("encoded {} samples to {}", summary.sample_count, path.display());
    Ok(summary)
}

/// Encode into an in-memory WAV file.
pub fn encode_to_bytes(samples: &[f32]) -> Result<Vec<u8>, MergeError> {
    let header = WavHeader::output(samples.len())?;
    let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + samples.len() * 2);
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&convert_to_int16_pcm(samples));
    Ok(bytes)
}

/// Convert samples to 16-bit PCM (little-endian bytes).
///
/// Output length = `samples.len() * 2` bytes.
pub fn convert_to_int16_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        data.extend_from_slice(&sample_to_pcm16(sample).0.to_le_bytes());
    }
    data
}

/// `round(sample * 32767)` clamped to the i16 range before narrowing.
///
/// The flag reports whether clamping changed the value.
fn sample_to_pcm16(sample: f32) -> (i16, bool) {
    let scaled = (sample * i16::MAX as f32).round();
    if scaled.is_nan() {
        return (0, false);
    }
    let clamped = scaled.clamp(i16::MIN as f32, i16::MAX as f32);
    (clamped as i16, clamped != scaled)
}

/// Compute SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, MergeError> {
    let data = fs::read(path).map_err(|e| MergeError::from_io(e, "failed to read for checksum", path))?;
    let digest = Sha256::digest(&data);
    Ok(hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
