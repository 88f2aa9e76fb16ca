/// WAV container layout: 44-byte header generation for output and RIFF/RIFX
/// chunk parsing for input.
use crate::models::audio_models::TARGET_SAMPLE_RATE;
use crate::models::error::MergeError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// `audioFormat` tag for integer PCM.
pub const PCM_FORMAT_TAG: u16 = 1;

/// `audioFormat` tag whose real encoding is a subformat GUID in the fmt extension.
pub const EXTENSIBLE_FORMAT_TAG: u16 = 0xFFFE;

/// Bytes 4..16 of every `KSDATAFORMAT_SUBTYPE_*` GUID that wraps a legacy tag,
/// as stored by a little-endian file.
const SUBFORMAT_GUID_TAIL_LE: [u8; 12] = [0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71];

/// The same tail as stored by a big-endian file (`Data2`/`Data3` swapped).
const SUBFORMAT_GUID_TAIL_BE: [u8; 12] = [0x00, 0x00, 0x00, 0x10, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71];

/// Bit depth of every encoded file.
pub const OUTPUT_BIT_DEPTH: u16 = 16;

/// Channel count of every encoded file.
pub const OUTPUT_CHANNELS: u16 = 1;

/// Largest output sample count whose byte length still fits the RIFF size field.
pub const MAX_OUTPUT_SAMPLES: u64 = (u32::MAX as u64 - 36) / 2;

/// Byte order declared by the container magic (`RIFF` little, `RIFX` big).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Fields of a WAVE `fmt ` chunk plus the length of its `data` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
    pub byte_order: ByteOrder,
}

impl WavHeader {
    /// Header for the fixed output format: mono, 16-bit, little-endian PCM.
    ///
    /// Fails when `sample_count` exceeds [`MAX_OUTPUT_SAMPLES`].
    pub fn output(sample_count: usize) -> Result<Self, MergeError> {
        if sample_count as u64 > MAX_OUTPUT_SAMPLES {
            return Err(MergeError::IoFailure(format!(
                "{} samples exceed the WAV size limit",
                sample_count
            )));
        }
        let block_align = OUTPUT_CHANNELS * OUTPUT_BIT_DEPTH / 8;
        Ok(Self {
            audio_format: PCM_FORMAT_TAG,
            channels: OUTPUT_CHANNELS,
            sample_rate: TARGET_SAMPLE_RATE,
            byte_rate: TARGET_SAMPLE_RATE * block_align as u32,
            block_align,
            bits_per_sample: OUTPUT_BIT_DEPTH,
            data_size: (sample_count * block_align as usize) as u32,
            byte_order: ByteOrder::LittleEndian,
        })
    }

    /// Bytes occupied by one sample of one channel.
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample as usize).div_ceil(8)
    }

    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        generate_wav_header(self.sample_rate, self.bits_per_sample, self.channels, self.data_size)
    }
}

/// Generate a 44-byte little-endian WAV RIFF header.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(sample_rate: u32, bit_depth: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;
    let chunk_size = data_size.saturating_add(36);

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// A parsed container: header fields and a view of the sample bytes.
#[derive(Debug)]
pub struct ParsedWav<'a> {
    pub header: WavHeader,
    pub data: &'a [u8],
}

/// Walk the chunks of a RIFF or RIFX WAVE file.
///
/// Unknown chunks are skipped (chunks are word-aligned). A `data` chunk whose
/// declared length runs past the end of the buffer is cut at the end.
pub fn parse_wav(bytes: &[u8]) -> Result<ParsedWav<'_>, MergeError> {
    if bytes.len() < 12 {
        return Err(MergeError::UnsupportedFormat("file too short for a RIFF header".into()));
    }
    let byte_order = match &bytes[0..4] {
        b"RIFF" => ByteOrder::LittleEndian,
        b"RIFX" => ByteOrder::BigEndian,
        _ => return Err(MergeError::UnsupportedFormat("missing RIFF/RIFX magic".into())),
    };
    if &bytes[8..12] != b"WAVE" {
        return Err(MergeError::UnsupportedFormat("RIFF form type is not WAVE".into()));
    }

    let mut fmt: Option<WavHeader> = None;
    let mut offset = 12usize;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4, byte_order) as usize;
        let body_start = offset + 8;
        let declared_end = body_start.saturating_add(size);
        let body_end = declared_end.min(bytes.len());

        match id {
            b"fmt " => {
                let body = &bytes[body_start..body_end];
                if body.len() < 16 {
                    return Err(MergeError::UnsupportedFormat(format!(
                        "fmt chunk too short: {} bytes",
                        body.len()
                    )));
                }
                fmt = Some(WavHeader {
                    audio_format: resolve_format_tag(body, byte_order),
                    channels: read_u16(body, 2, byte_order),
                    sample_rate: read_u32(body, 4, byte_order),
                    byte_rate: read_u32(body, 8, byte_order),
                    block_align: read_u16(body, 12, byte_order),
                    bits_per_sample: read_u16(body, 14, byte_order),
                    data_size: 0,
                    byte_order,
                });
            }
            b"data" => {
                let Some(mut header) = fmt else {
                    return Err(MergeError::UnsupportedFormat("data chunk precedes fmt chunk".into()));
                };
                if declared_end > bytes.len() {
                    log::warn!(
                        "data chunk declares {} bytes but only {} are present",
                        size,
                        body_end - body_start
                    );
                }
                header.data_size = size as u32;
                return Ok(ParsedWav {
                    header,
                    data: &bytes[body_start..body_end],
                });
            }
            _ => {
                log::debug!("skipping chunk {:?} ({} bytes)", String::from_utf8_lossy(id), size);
            }
        }

        offset = declared_end.saturating_add(size & 1);
    }

    if fmt.is_none() {
        Err(MergeError::UnsupportedFormat("missing fmt chunk".into()))
    } else {
        Err(MergeError::UnsupportedFormat("missing data chunk".into()))
    }
}

/// Format tag of a fmt chunk body, unwrapping `WAVE_FORMAT_EXTENSIBLE`.
///
/// An extensible header whose subformat GUID wraps a legacy tag reports that
/// tag. Anything else keeps [`EXTENSIBLE_FORMAT_TAG`].
fn resolve_format_tag(body: &[u8], order: ByteOrder) -> u16 {
    let tag = read_u16(body, 0, order);
    if tag != EXTENSIBLE_FORMAT_TAG || body.len() < 40 {
        return tag;
    }
    let expected_tail = match order {
        ByteOrder::LittleEndian => SUBFORMAT_GUID_TAIL_LE,
        ByteOrder::BigEndian => SUBFORMAT_GUID_TAIL_BE,
    };
    let subformat = read_u32(body, 24, order);
    if body[28..40] != expected_tail || subformat > u16::MAX as u32 {
        log::debug!("extensible fmt chunk with unrecognized subformat GUID");
        return tag;
    }
    log::debug!("extensible fmt chunk wraps format tag {}", subformat);
    subformat as u16
}

fn read_u16(bytes: &[u8], offset: usize, order: ByteOrder) -> u16 {
    let raw = [bytes[offset], bytes[offset + 1]];
    match order {
        ByteOrder::LittleEndian => u16::from_le_bytes(raw),
        ByteOrder::BigEndian => u16::from_be_bytes(raw),
    }
}

fn read_u32(bytes: &[u8], offset: usize, order: ByteOrder) -> u32 {
    let raw = [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]];
    match order {
        ByteOrder::LittleEndian => u32::from_le_bytes(raw),
        ByteOrder::BigEndian => u32::from_be_bytes(raw),
    }
}
