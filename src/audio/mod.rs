//! WAV Decoding Module
//!
//! Turns RIFF/WAVE byte streams into normalized per-channel `f64` samples.
//! Layered bottom-up: byte cursor, chunk scanner, `fmt ` parser, sample
//! decoder, and the `decode` entry points on top.

pub mod chunk;
pub mod cursor;
pub mod format;
pub mod reference;
pub mod sample;
pub mod wav;

#[cfg(test)]
pub(crate) mod test_support;

pub use chunk::{ChunkScanner, RiffHeader, ScanMode, ScanState};
pub use format::FormatDescriptor;
pub use reference::{ComparisonReport, ReferenceAudio};
pub use sample::{SampleDecoder, SampleEncoding};
pub use wav::{ChunkInfo, DecodedAudio, WavInfo, decode, decode_bytes, probe, probe_bytes};
