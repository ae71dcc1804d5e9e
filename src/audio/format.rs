//! `fmt ` chunk parsing

use crate::audio::cursor::ByteCursor;
use crate::audio::sample::SampleEncoding;
use crate::error::{DecodeError, Result};

pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Canonical PCM `fmt ` payload length; anything after it is extension data.
pub const MIN_FMT_LEN: usize = 16;

/// Validated contents of a `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub audio_format_code: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    /// Decode and validate a `fmt ` payload.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() < MIN_FMT_LEN {
            return Err(DecodeError::TruncatedFormatChunk { len: payload.len() });
        }

        let mut cursor = ByteCursor::new(payload);
        let format = Self {
            audio_format_code: cursor.read_u16_le()?,
            num_channels: cursor.read_u16_le()?,
            sample_rate: cursor.read_u32_le()?,
            byte_rate: cursor.read_u32_le()?,
            block_align: cursor.read_u16_le()?,
            bits_per_sample: cursor.read_u16_le()?,
        };

        if cursor.remaining() > 0 {
            log::debug!("Ignoring {} bytes of fmt extension data", cursor.remaining());
        }

        format.validate()?;
        Ok(format)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(DecodeError::InvalidChannelCount);
        }

        if self.sample_rate == 0 {
            return Err(DecodeError::InvalidSampleRate);
        }

        // Also rejects unsupported codes and bit depths.
        self.encoding()?;

        let expected = self.expected_block_align();
        if u32::from(self.block_align) != expected {
            return Err(DecodeError::BlockAlignMismatch {
                declared: self.block_align,
                expected,
            });
        }

        let expected_rate = u64::from(self.sample_rate) * u64::from(self.block_align);
        if u64::from(self.byte_rate) != expected_rate {
            log::warn!(
                "fmt byte rate {} disagrees with sample_rate * block_align = {}",
                self.byte_rate,
                expected_rate
            );
        }

        Ok(())
    }

    /// Sample encoding implied by the format code and bit depth.
    pub fn encoding(&self) -> Result<SampleEncoding> {
        let encoding = match (self.audio_format_code, self.bits_per_sample) {
            (WAVE_FORMAT_PCM, 8) => SampleEncoding::U8,
            (WAVE_FORMAT_PCM, 16) => SampleEncoding::I16,
            (WAVE_FORMAT_PCM, 24) => SampleEncoding::I24,
            (WAVE_FORMAT_PCM, 32) => SampleEncoding::I32,
            (WAVE_FORMAT_IEEE_FLOAT, 32) => SampleEncoding::F32,
            (WAVE_FORMAT_IEEE_FLOAT, 64) => SampleEncoding::F64,
            (WAVE_FORMAT_PCM | WAVE_FORMAT_IEEE_FLOAT, bits) => {
                return Err(DecodeError::UnsupportedBitDepth {
                    format_code: self.audio_format_code,
                    bits,
                });
            }
            (code, _) => return Err(DecodeError::UnsupportedAudioFormatCode(code)),
        };
        Ok(encoding)
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Bytes per frame, derived from channels and bit depth.
    pub fn frame_size(&self) -> usize {
        usize::from(self.num_channels) * self.bytes_per_sample()
    }

    fn expected_block_align(&self) -> u32 {
        u32::from(self.num_channels) * u32::from(self.bits_per_sample / 8)
    }

    pub fn is_float(&self) -> bool {
        self.audio_format_code == WAVE_FORMAT_IEEE_FLOAT
    }
}

impl std::fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_float() { "float" } else { "pcm" };
        write!(
            f,
            "{} Hz, {} ch, {}-bit {}",
            self.sample_rate, self.num_channels, self.bits_per_sample, kind
        )
    }
}
