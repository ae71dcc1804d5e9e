//! wavdecode - Sample-Accurate WAV Decoding Library
//!
//! Decodes canonical RIFF/WAVE files (integer PCM and IEEE float) into
//! normalized, per-channel `f64` buffers.

pub mod audio;
pub mod config;
pub mod error;
pub mod processing;

pub use audio::{DecodedAudio, FormatDescriptor, WavInfo, decode, decode_bytes, probe};
pub use config::{Args, Config};
pub use error::{DecodeError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialise `env_logger`. `RUST_LOG` still takes precedence.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
