//! Configuration management for the decoding CLI

use crate::audio::reference::DEFAULT_TOLERANCE;
use crate::error::{DecodeError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub verify: VerifyConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub enabled: bool,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub workers: usize,
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Samples printed per channel.
    pub preview_samples: usize,
    /// Print the chunk table instead of decoding.
    pub probe: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            verify: VerifyConfig::default(),
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: utils::cpu_count(),
            verbose: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_samples: 8,
            probe: false,
        }
    }
}

impl Config {
    pub fn workers(&self) -> usize {
        self.processing.workers
    }

    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }

    pub fn tolerance(&self) -> f64 {
        self.verify.tolerance
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wavdecode", about = "Decode RIFF/WAVE files into normalized samples", version, author)]
pub struct Args {
    #[arg(help = "Input WAV files")]
    pub inputs: Vec<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(long = "verify", help = "Cross-check every channel against the reference decoder")]
    pub verify: bool,

    #[arg(long = "tolerance", help = "Absolute per-sample tolerance for --verify")]
    pub tolerance: Option<f64>,

    #[arg(short = 'j', long = "workers", help = "Number of files decoded in parallel")]
    pub workers: Option<usize>,

    #[arg(long = "preview", help = "Samples printed per channel")]
    pub preview: Option<usize>,

    #[arg(long = "probe", help = "Print the chunk layout instead of decoding")]
    pub probe: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if !args.inputs.is_empty() {
            config.inputs = args.inputs;
        }
        if let Some(tolerance) = args.tolerance {
            config.verify.tolerance = tolerance;
        }
        if let Some(workers) = args.workers {
            config.processing.workers = workers;
        }
        if let Some(preview) = args.preview {
            config.output.preview_samples = preview;
        }
        config.verify.enabled |= args.verify;
        config.processing.verbose |= args.verbose;
        config.output.probe |= args.probe;

        config.validate()?;
        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DecodeError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DecodeError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.verify.tolerance.is_finite() || self.verify.tolerance <= 0.0 {
            return Err(DecodeError::config("Tolerance must be a positive finite number"));
        }

        if self.processing.workers == 0 {
            return Err(DecodeError::config("Worker count must be greater than 0"));
        }

        if self.inputs.is_empty() {
            return Err(DecodeError::config("No input files given"));
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DecodeError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DecodeError::config(format!("Failed to write config file: {}", e)))
    }
}

pub mod utils {
    pub fn cpu_count() -> usize {
        num_cpus::get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["wavdecode"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tolerance(), 1e-3);
        assert_eq!(config.output.preview_samples, 8);
        assert!(config.workers() > 0);
        assert!(!config.verify.enabled);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.inputs.push(PathBuf::from("a.wav"));
        assert!(config.validate().is_ok());

        config.verify.tolerance = 0.0;
        assert!(config.validate().is_err());
        config.verify.tolerance = f64::NAN;
        assert!(config.validate().is_err());
        config.verify.tolerance = 1e-3;

        config.processing.workers = 0;
        assert!(config.validate().is_err());
        config.processing.workers = 1;

        config.inputs.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.verify.tolerance = 5e-4;
        config.inputs.push(PathBuf::from("clip.wav"));

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.tolerance(), 5e-4);
        assert_eq!(loaded.inputs, vec![PathBuf::from("clip.wav")]);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[verify]\nenabled = true\n").unwrap();

        let loaded = Config::from_file(&config_path).unwrap();
        assert!(loaded.verify.enabled);
        assert_eq!(loaded.tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(loaded.output.preview_samples, 8);
    }

    #[test]
    fn test_args_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "inputs = [\"from_file.wav\"]\n[processing]\nworkers = 3\n",
        )
        .unwrap();
        let config_arg = config_path.to_string_lossy().into_owned();

        let config = Config::from_args_and_config(args(&["-c", config_arg.as_str(), "-j", "2"])).unwrap();
        assert_eq!(config.workers(), 2);
        assert_eq!(config.inputs, vec![PathBuf::from("from_file.wav")]);

        let config = Config::from_args_and_config(args(&[
            "-c", config_arg.as_str(), "cli.wav", "--verify", "--tolerance", "0.01",
        ]))
        .unwrap();
        assert_eq!(config.inputs, vec![PathBuf::from("cli.wav")]);
        assert!(config.verify.enabled);
        assert_eq!(config.tolerance(), 0.01);
    }

    #[test]
    fn test_verbose_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("verbose.toml");
        std::fs::write(&config_path, "[processing]\nverbose = true\n").unwrap();
        let config_arg = config_path.to_string_lossy().into_owned();

        let config = Config::from_args_and_config(args(&["-c", config_arg.as_str(), "a.wav"])).unwrap();
        assert!(config.verbose());

        let config = Config::from_args_and_config(args(&["-v", "a.wav"])).unwrap();
        assert!(config.verbose());
        let config = Config::from_args_and_config(args(&["a.wav"])).unwrap();
        assert!(!config.verbose());
    }

    #[test]
    fn test_args_without_inputs_rejected() {
        assert!(Config::from_args_and_config(args(&[])).is_err());
    }
}
