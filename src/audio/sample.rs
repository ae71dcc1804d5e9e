//! `data` chunk decoding into normalized per-channel samples

use ndarray::Array2;

use crate::audio::format::FormatDescriptor;
use crate::error::{DecodeError, Result};

/// On-disk representation of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// Unsigned 8-bit with a bias of 128.
    U8,
    I16,
    /// Packed 3-byte signed integer.
    I24,
    I32,
    F32,
    F64,
}

impl SampleEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SampleEncoding::U8 => "u8",
            SampleEncoding::I16 => "int16",
            SampleEncoding::I24 => "int24",
            SampleEncoding::I32 => "int32",
            SampleEncoding::F32 => "float32",
            SampleEncoding::F64 => "float64",
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleEncoding::U8 => 1,
            SampleEncoding::I16 => 2,
            SampleEncoding::I24 => 3,
            SampleEncoding::I32 | SampleEncoding::F32 => 4,
            SampleEncoding::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleEncoding::F32 | SampleEncoding::F64)
    }

    /// Decode one sample. `b` must hold exactly `bytes_per_sample()` bytes.
    ///
    /// Integers are divided by the magnitude of their signed range, so results
    /// lie in [-1.0, 1.0). Floats are passed through unscaled.
    #[inline]
    pub fn decode(&self, b: &[u8]) -> f64 {
        match self {
            SampleEncoding::U8 => (f64::from(b[0]) - 128.0) / 128.0,
            SampleEncoding::I16 => f64::from(i16::from_le_bytes([b[0], b[1]])) / 32768.0,
            SampleEncoding::I24 => {
                // Place the 3 bytes in the high end, then shift back to sign-extend.
                let v = i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8;
                f64::from(v) / 8_388_608.0
            }
            SampleEncoding::I32 => {
                f64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])) / 2_147_483_648.0
            }
            SampleEncoding::F32 => f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            SampleEncoding::F64 => {
                f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
            }
        }
    }
}

/// Turns an interleaved `data` payload into a `(channels, frames)` array.
#[derive(Debug, Clone, Copy)]
pub struct SampleDecoder {
    encoding: SampleEncoding,
    channels: usize,
    frame_size: usize,
}

impl SampleDecoder {
    pub fn new(format: &FormatDescriptor) -> Result<Self> {
        Ok(Self {
            encoding: format.encoding()?,
            channels: usize::from(format.num_channels),
            frame_size: format.frame_size(),
        })
    }

    pub fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    /// Number of whole frames in a payload of `len` bytes.
    pub fn num_frames(&self, len: usize) -> usize {
        if self.frame_size == 0 { 0 } else { len / self.frame_size }
    }

    pub fn decode(&self, payload: &[u8]) -> Result<Array2<f64>> {
        if self.frame_size == 0 {
            if payload.is_empty() {
                return Ok(Array2::zeros((self.channels, 0)));
            }
            return Err(DecodeError::EmptyDataChunk);
        }

        let num_frames = self.num_frames(payload.len());
        let trailing = payload.len() % self.frame_size;
        if trailing > 0 {
            log::warn!(
                "Discarding {} trailing bytes that do not complete a {}-byte frame",
                trailing,
                self.frame_size
            );
        }

        let width = self.encoding.bytes_per_sample();
        let mut out = Array2::zeros((self.channels, num_frames));

        for (frame_idx, frame) in payload.chunks_exact(self.frame_size).enumerate() {
            for (channel, sample) in frame.chunks_exact(width).enumerate() {
                out[[channel, frame_idx]] = self.encoding.decode(sample);
            }
        }

        Ok(out)
    }
}
