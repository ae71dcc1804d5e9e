//! Cross-validation against the `hound` reference decoder
//!
//! Every channel and every frame is compared, not only the first channel.
//! hound has no 64-bit float support; such files are reported as skipped.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use ndarray::Array2;

use crate::audio::format::FormatDescriptor;
use crate::audio::sample::SampleEncoding;
use crate::audio::wav::{self, DecodedAudio};
use crate::error::{DecodeError, Result};

/// Default absolute tolerance per sample.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Whether hound can decode files with this format.
pub fn reference_supports(format: &FormatDescriptor) -> bool {
    format.encoding().is_ok_and(|e| e != SampleEncoding::F64)
}

/// Samples produced by the reference decoder, laid out like `DecodedAudio`.
#[derive(Debug, Clone)]
pub struct ReferenceAudio {
    pub sample_rate: u32,
    pub samples: Array2<f64>,
}

impl ReferenceAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reference_err = |source| DecodeError::Reference {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = WavReader::open(path).map_err(reference_err)?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels);

        let interleaved: Vec<f64> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(reference_err)?,
            SampleFormat::Int => {
                let scale = f64::from(1u32 << (spec.bits_per_sample - 1));
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| f64::from(v) / scale))
                    .collect::<std::result::Result<Vec<f64>, _>>()
                    .map_err(reference_err)?
            }
        };

        let frames = interleaved.len() / channels.max(1);
        let mut samples = Array2::zeros((channels, frames));
        for (i, v) in interleaved.into_iter().take(frames * channels).enumerate() {
            samples[[i % channels, i / channels]] = v;
        }

        Ok(Self { sample_rate: spec.sample_rate, samples })
    }

    pub fn num_frames(&self) -> usize {
        self.samples.ncols()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDiff {
    pub channel: usize,
    pub max_abs_diff: f64,
    /// Frame holding the largest difference.
    pub worst_frame: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub tolerance: f64,
    /// False when the reference decoder cannot read the encoding at all.
    pub reference_supported: bool,
    pub sample_rate_match: bool,
    pub decoded_channels: usize,
    pub reference_channels: usize,
    pub decoded_frames: usize,
    pub reference_frames: usize,
    pub channels: Vec<ChannelDiff>,
}

impl ComparisonReport {
    /// Report for a file the reference decoder cannot read.
    pub fn unsupported(decoded: &DecodedAudio, tolerance: f64) -> Self {
        let samples = decoded.as_array();
        Self {
            tolerance,
            reference_supported: false,
            sample_rate_match: false,
            decoded_channels: samples.nrows(),
            reference_channels: 0,
            decoded_frames: samples.ncols(),
            reference_frames: 0,
            channels: Vec::new(),
        }
    }

    pub fn skipped(&self) -> bool {
        !self.reference_supported
    }

    pub fn max_abs_diff(&self) -> f64 {
        self.channels.iter().map(|c| c.max_abs_diff).fold(0.0, f64::max)
    }

    /// A skipped comparison counts as passed: there is nothing to contradict.
    pub fn passed(&self) -> bool {
        if self.skipped() {
            return true;
        }
        self.sample_rate_match
            && self.decoded_channels == self.reference_channels
            && self.decoded_frames == self.reference_frames
            && self.channels.iter().all(|c| c.max_abs_diff <= self.tolerance)
    }
}

impl std::fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.skipped() {
            return write!(
                f,
                "SKIP (reference decoder cannot read this encoding, {} ch x {} frames)",
                self.decoded_channels, self.decoded_frames
            );
        }
        write!(
            f,
            "{} (max diff {:.3e}, tolerance {:.1e}, {} ch x {} frames)",
            if self.passed() { "PASS" } else { "FAIL" },
            self.max_abs_diff(),
            self.tolerance,
            self.decoded_channels,
            self.decoded_frames
        )?;
        if self.decoded_frames != self.reference_frames {
            write!(f, " frame count mismatch: reference has {}", self.reference_frames)?;
        }
        if self.decoded_channels != self.reference_channels {
            write!(f, " channel count mismatch: reference has {}", self.reference_channels)?;
        }
        Ok(())
    }
}

/// Compare overlapping channels and frames sample by sample.
pub fn compare(decoded: &DecodedAudio, reference: &ReferenceAudio, tolerance: f64) -> ComparisonReport {
    let ours = decoded.as_array();
    let theirs = &reference.samples;

    let channels = ours
        .outer_iter()
        .zip(theirs.outer_iter())
        .enumerate()
        .map(|(channel, (a, b))| {
            let (worst_frame, max_abs_diff) = a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs())
                .enumerate()
                .fold((0, 0.0f64), |best, (i, d)| if d > best.1 { (i, d) } else { best });
            ChannelDiff { channel, max_abs_diff, worst_frame }
        })
        .collect();

    ComparisonReport {
        tolerance,
        reference_supported: true,
        sample_rate_match: decoded.sample_rate() == reference.sample_rate,
        decoded_channels: ours.nrows(),
        reference_channels: theirs.nrows(),
        decoded_frames: ours.ncols(),
        reference_frames: theirs.ncols(),
        channels,
    }
}

/// Decode `path` with both decoders and compare the results.
pub fn verify_file<P: AsRef<Path>>(path: P, tolerance: f64) -> Result<ComparisonReport> {
    let path = path.as_ref();
    let decoded = wav::decode(path)?;
    if !reference_supports(decoded.format()) {
        log::info!(
            "{}: reference decoder cannot read {}, skipping comparison",
            path.display(),
            decoded.format()
        );
        return Ok(ComparisonReport::unsupported(&decoded, tolerance));
    }

    let reference = ReferenceAudio::from_file(path)?;
    let report = compare(&decoded, &reference, tolerance);

    if report.passed() {
        log::debug!("{}: {}", path.display(), report);
    } else {
        log::warn!("{}: {}", path.display(), report);
    }
    Ok(report)
}
