//! WAV decoding entry points

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::audio::chunk::{ChunkKind, ChunkScanner, RiffHeader, ScanMode};
use crate::audio::format::FormatDescriptor;
use crate::audio::sample::{SampleDecoder, SampleEncoding};
use crate::error::{DecodeError, Result};

/// Fully decoded audio. Owns its sample buffers; dropping it releases them.
///
/// Samples are stored as a `(channels, frames)` array, so every channel has
/// exactly `num_frames` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    format: FormatDescriptor,
    samples: Array2<f64>,
}

impl DecodedAudio {
    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn num_channels(&self) -> u32 {
        u32::from(self.format.num_channels)
    }

    pub fn num_frames(&self) -> u64 {
        self.samples.ncols() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.ncols() == 0
    }

    pub fn duration(&self) -> f64 {
        self.num_frames() as f64 / f64::from(self.sample_rate())
    }

    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.samples.nrows()).then(|| self.samples.row(index))
    }

    pub fn channels(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.samples.outer_iter()
    }

    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.samples.view()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.samples
    }

    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.samples.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Frame-major samples, as they were laid out on disk.
    pub fn interleaved(&self) -> Vec<f64> {
        self.samples.t().iter().copied().collect()
    }

    /// Per-frame mean of all channels.
    pub fn to_mono(&self) -> Array1<f64> {
        self.samples
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.samples.ncols()))
    }
}

/// One chunk seen by `probe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub id: String,
    pub offset: usize,
    pub size: u32,
}

/// Container and format metadata, without sample decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub riff: RiffHeader,
    pub format: FormatDescriptor,
    pub encoding: SampleEncoding,
    pub chunks: Vec<ChunkInfo>,
    pub data_len: usize,
    pub num_frames: u64,
    pub file_len: usize,
}

impl WavInfo {
    pub fn duration(&self) -> f64 {
        self.num_frames as f64 / f64::from(self.format.sample_rate)
    }
}

/// Read one WAV file and decode every channel.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let bytes = read_file(path.as_ref())?;
    decode_bytes(&bytes)
}

/// Decode a complete RIFF/WAVE image held in memory.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedAudio> {
    let mut format = None;
    let mut data = None;

    ChunkScanner::new(bytes).scan(|chunk| {
        match chunk.kind {
            ChunkKind::Format => format = Some(FormatDescriptor::parse(chunk.payload)?),
            ChunkKind::Data => data = Some(chunk.payload),
            ChunkKind::Other => {}
        }
        Ok(())
    })?;

    let format = format.ok_or(DecodeError::MissingFormatChunk)?;
    let data = data.ok_or(DecodeError::MissingDataChunk)?;

    let samples = SampleDecoder::new(&format)?.decode(data)?;
    Ok(DecodedAudio { format, samples })
}

/// Walk every chunk of a WAV file and report its layout.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let bytes = read_file(path.as_ref())?;
    probe_bytes(&bytes)
}

pub fn probe_bytes(bytes: &[u8]) -> Result<WavInfo> {
    let mut format = None;
    let mut data_len = None;
    let mut chunks = Vec::new();

    let riff = ChunkScanner::with_mode(bytes, ScanMode::Full).scan(|chunk| {
        chunks.push(ChunkInfo {
            id: chunk.header.id_str(),
            offset: chunk.offset,
            size: chunk.header.size,
        });
        match chunk.kind {
            ChunkKind::Format => format = Some(FormatDescriptor::parse(chunk.payload)?),
            ChunkKind::Data => data_len = Some(chunk.payload.len()),
            ChunkKind::Other => {}
        }
        Ok(())
    })?;

    let format = format.ok_or(DecodeError::MissingFormatChunk)?;
    let data_len = data_len.ok_or(DecodeError::MissingDataChunk)?;
    let decoder = SampleDecoder::new(&format)?;

    Ok(WavInfo {
        riff,
        format,
        encoding: decoder.encoding(),
        chunks,
        data_len,
        num_frames: decoder.num_frames(data_len) as u64,
        file_len: bytes.len(),
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| DecodeError::from_io(path, e))?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
