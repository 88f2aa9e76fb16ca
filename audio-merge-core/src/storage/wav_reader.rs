use std::fs;
use std::path::Path;

use crate::models::audio_models::{AudioTrack, TARGET_SAMPLE_RATE};
use crate::models::error::MergeError;
use crate::processing::wav_format::{self, ByteOrder, WavHeader, PCM_FORMAT_TAG};

/// A decoded track together with the header it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTrack {
    pub track: AudioTrack,
    pub header: WavHeader,
}

/// Read a mono PCM WAV file into normalized samples.
///
/// Accepts 8-bit unsigned and 16-bit signed PCM in either byte order, with a
/// plain or `WAVE_FORMAT_EXTENSIBLE` fmt chunk. Other bit depths, non-PCM
/// encodings, and multi-channel files fail with `UnsupportedFormat`.
pub fn decode(path: &Path) -> Result<DecodedTrack, MergeError> {
    let bytes = fs::read(path).map_err(|e| MergeError::from_io(e, "failed to read", path))?;
    let decoded = decode_bytes(&bytes).map_err(|e| match e {
        MergeError::UnsupportedFormat(reason) => {
            MergeError::UnsupportedFormat(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })?;
    log::debug!(
        "decoded {}: {} samples, {} Hz, {}-bit",
        path.display(),
        decoded.track.len(),
        decoded.header.sample_rate,
        decoded.header.bits_per_sample
    );
    Ok(decoded)
}

/// Decode an in-memory WAV file.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedTrack, MergeError> {
    let parsed = wav_format::parse_wav(bytes)?;
    let header = parsed.header;

    if header.audio_format != PCM_FORMAT_TAG {
        return Err(MergeError::UnsupportedFormat(format!(
            "encoding tag {} is not integer PCM",
            header.audio_format
        )));
    }
    if header.channels != 1 {
        return Err(MergeError::UnsupportedFormat(format!(
            "{} channels; only mono input is supported",
            header.channels
        )));
    }
    let convert: fn([u8; 2], ByteOrder) -> f32 = match header.bits_per_sample {
        8 => |raw: [u8; 2], _: ByteOrder| (raw[0] as f32 - 128.0) / 128.0,
        16 => |raw: [u8; 2], order: ByteOrder| {
            let value = match order {
                ByteOrder::LittleEndian => i16::from_le_bytes(raw),
                ByteOrder::BigEndian => i16::from_be_bytes(raw),
            };
            value as f32 / 32768.0
        },
        bits => {
            return Err(MergeError::UnsupportedFormat(format!("unsupported bit depth: {}", bits)));
        }
    };

    let sample_width = header.bytes_per_sample();
    let frame_size = (header.block_align as usize).max(sample_width);
    if header.block_align as usize != sample_width {
        log::warn!(
            "block align {} does not match {}-bit mono; using a {}-byte frame",
            header.block_align,
            header.bits_per_sample,
            frame_size
        );
    }
    if header.sample_rate != TARGET_SAMPLE_RATE {
        log::warn!(
            "input is {} Hz; samples are used as-is at {} Hz",
            header.sample_rate,
            TARGET_SAMPLE_RATE
        );
    }

    let samples: Vec<f32> = parsed
        .data
        .chunks_exact(frame_size)
        .map(|frame| {
            let raw = if sample_width == 1 { [frame[0], 0] } else { [frame[0], frame[1]] };
            convert(raw, header.byte_order)
        })
        .collect();

    Ok(DecodedTrack {
        track: AudioTrack::new(samples),
        header,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::wav_format::generate_wav_header;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_merge_reader_test_{}", name))
    }

    fn wav_with_data(sample_rate: u32, bits: u16, channels: u16, data: &[u8]) -> Vec<u8> {
        let mut file = generate_wav_header(sample_rate, bits, channels, data.len() as u32).to_vec();
        file.extend_from_slice(data);
        file
    }

    #[test]
    fn decodes_16_bit_little_endian() {
        let mut data = Vec::new();
        for value in [0i16, 16384, -32768, 32767] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        let decoded = decode_bytes(&wav_with_data(44100, 16, 1, &data)).unwrap();
        let samples = decoded.track.samples();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert_relative_eq!(samples[1], 0.5);
        assert_eq!(samples[2], -1.0);
        assert_relative_eq!(samples[3], 32767.0 / 32768.0);
    }

    #[test]
    fn decodes_16_bit_big_endian() {
        let mut file = Vec::new();
        file.extend_from_slice(b"RIFX");
        file.extend_from_slice(&40u32.to_be_bytes());
        file.extend_from_slice(b"WAVE");
        file.extend_from_slice(b"fmt ");
        file.extend_from_slice(&16u32.to_be_bytes());
        file.extend_from_slice(&1u16.to_be_bytes());
        file.extend_from_slice(&1u16.to_be_bytes());
        file.extend_from_slice(&44100u32.to_be_bytes());
        file.extend_from_slice(&88200u32.to_be_bytes());
        file.extend_from_slice(&2u16.to_be_bytes());
        file.extend_from_slice(&16u16.to_be_bytes());
        file.extend_from_slice(b"data");
        file.extend_from_slice(&4u32.to_be_bytes());
        file.extend_from_slice(&16384i16.to_be_bytes());
        file.extend_from_slice(&(-16384i16).to_be_bytes());

        let decoded = decode_bytes(&file).unwrap();
        assert_eq!(decoded.track.samples(), &[0.5, -0.5]);
    }

    #[test]
    fn decodes_8_bit_unsigned() {
        let decoded = decode_bytes(&wav_with_data(44100, 8, 1, &[128, 255, 0, 192])).unwrap();
        let samples = decoded.track.samples();

        assert_eq!(samples[0], 0.0);
        assert_relative_eq!(samples[1], 127.0 / 128.0);
        assert_eq!(samples[2], -1.0);
        assert_eq!(samples[3], 0.5);
    }

    #[test]
    fn unsupported_bit_depth_fails_instead_of_zero_filling() {
        let file = wav_with_data(44100, 24, 1, &[0, 0, 64, 0, 0, 192]);
        assert_eq!(
            decode_bytes(&file).unwrap_err(),
            MergeError::UnsupportedFormat("unsupported bit depth: 24".into())
        );
    }

    #[test]
    fn multi_channel_input_is_rejected() {
        let file = wav_with_data(44100, 16, 2, &[0; 8]);
        assert!(matches!(decode_bytes(&file), Err(MergeError::UnsupportedFormat(_))));
    }

    #[test]
    fn non_pcm_encoding_is_rejected() {
        let mut file = wav_with_data(44100, 16, 1, &[0; 4]);
        // IEEE float tag
        file[20..22].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(decode_bytes(&file), Err(MergeError::UnsupportedFormat(_))));
    }

    /// Mono 16-bit `WAVE_FORMAT_EXTENSIBLE` file whose subformat GUID wraps `subformat`.
    fn extensible_wav(subformat: u32, data: &[u8]) -> Vec<u8> {
        let mut fmt = Vec::new();
        fmt.extend_from_slice(&0xFFFEu16.to_le_bytes());
        fmt.extend_from_slice(&1u16.to_le_bytes());
        fmt.extend_from_slice(&44100u32.to_le_bytes());
        fmt.extend_from_slice(&88200u32.to_le_bytes());
        fmt.extend_from_slice(&2u16.to_le_bytes());
        fmt.extend_from_slice(&16u16.to_le_bytes());
        fmt.extend_from_slice(&22u16.to_le_bytes()); // cbSize
        fmt.extend_from_slice(&16u16.to_le_bytes()); // valid bits
        fmt.extend_from_slice(&4u32.to_le_bytes()); // channel mask: front center
        fmt.extend_from_slice(&subformat.to_le_bytes());
        fmt.extend_from_slice(&[0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71]);

        let mut file = Vec::new();
        file.extend_from_slice(b"RIFF");
        file.extend_from_slice(&((4 + 8 + fmt.len() + 8 + data.len()) as u32).to_le_bytes());
        file.extend_from_slice(b"WAVE");
        file.extend_from_slice(b"fmt ");
        file.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(b"data");
        file.extend_from_slice(&(data.len() as u32).to_le_bytes());
        file.extend_from_slice(data);
        file
    }

    #[test]
    fn extensible_header_with_pcm_subformat_decodes() {
        let data = [0x00, 0x40, 0x00, 0xC0];
        let decoded = decode_bytes(&extensible_wav(1, &data)).unwrap();

        assert_eq!(decoded.header.audio_format, PCM_FORMAT_TAG);
        assert_eq!(decoded.track.len(), 2);
        assert_relative_eq!(decoded.track.samples()[0], 0.5);
        assert_relative_eq!(decoded.track.samples()[1], -0.5);
    }

    #[test]
    fn extensible_header_with_float_subformat_is_rejected() {
        let err = decode_bytes(&extensible_wav(3, &[0; 8])).unwrap_err();
        assert!(matches!(err, MergeError::UnsupportedFormat(ref reason) if reason.contains("tag 3")));
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let decoded = decode_bytes(&wav_with_data(44100, 16, 1, &[0, 64, 7])).unwrap();
        assert_eq!(decoded.track.samples(), &[0.5]);
    }

    #[test]
    fn other_sample_rates_are_read_as_is() {
        let decoded = decode_bytes(&wav_with_data(22050, 8, 1, &[128, 128])).unwrap();
        assert_eq!(decoded.header.sample_rate, 22050);
        assert_eq!(decoded.track.len(), 2);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let path = temp_file_path("does_not_exist.wav");
        assert!(matches!(decode(&path), Err(MergeError::FileNotFound(_))));
    }

    #[test]
    fn decode_reads_from_disk_and_names_the_file_on_failure() {
        let good = temp_file_path("good.wav");
        fs::write(&good, wav_with_data(44100, 8, 1, &[128, 192])).unwrap();
        assert_eq!(decode(&good).unwrap().track.samples(), &[0.0, 0.5]);

        let bad = temp_file_path("bad.wav");
        fs::write(&bad, b"not a wave file").unwrap();
        match decode(&bad) {
            Err(MergeError::UnsupportedFormat(msg)) => assert!(msg.contains("bad.wav")),
            other => panic!("unexpected result: {other:?}"),
        }

        fs::remove_file(&good).ok();
        fs::remove_file(&bad).ok();
    }
}
