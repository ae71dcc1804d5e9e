//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while decoding a WAV file.
///
/// Variants split into environment failures (the file could not be read) and
/// malformed-input failures (the bytes are not a decodable canonical WAV).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid RIFF/WAVE header")]
    InvalidRiffHeader,

    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("No 'fmt ' chunk found")]
    MissingFormatChunk,

    #[error("No 'data' chunk found")]
    MissingDataChunk,

    #[error("Duplicate 'fmt ' chunk before 'data'")]
    DuplicateFormatChunk,

    #[error("'fmt ' chunk too short: {len} bytes (minimum 16)")]
    TruncatedFormatChunk { len: usize },

    #[error("Invalid channel count: 0")]
    InvalidChannelCount,

    #[error("Invalid sample rate: 0")]
    InvalidSampleRate,

    #[error("Unsupported bit depth {bits} for audio format {format_code}")]
    UnsupportedBitDepth { format_code: u16, bits: u16 },

    #[error("Unsupported audio format code: {0:#06x}")]
    UnsupportedAudioFormatCode(u16),

    #[error("Block align mismatch: declared {declared}, expected {expected}")]
    BlockAlignMismatch { declared: u16, expected: u32 },

    #[error("Data chunk has zero-sized frames")]
    EmptyDataChunk,

    #[error("Reference decoder failed on {}: {source}", path.display())]
    Reference {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl DecodeError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config { message: msg.into() }
    }

    pub fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedInput { needed, remaining }
    }

    /// Builds the I/O variant for `path`, folding `NotFound` into `FileNotFound`.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source: err }
        }
    }

    /// Operational failure: the storage layer could not supply the bytes.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::Io { .. })
    }

    /// Data-quality failure: the bytes were read but are not a decodable WAV.
    pub fn is_malformed(&self) -> bool {
        !self.is_io() && !matches!(self, Self::Reference { .. } | Self::Config { .. })
    }

    /// Short label used when reporting a failed file.
    pub fn category(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } | Self::Io { .. } => "io",
            Self::Reference { .. } => "reference",
            Self::Config { .. } => "config",
            _ => "malformed",
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
