//! Parallel batch decoding
//!
//! Each file is decoded independently on a rayon pool. Decodes share no
//! state, so a failing file never affects the others.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::audio::{self, DecodedAudio};
use crate::error::{DecodeError, Result};

pub struct FileOutcome<T> {
    pub path: PathBuf,
    pub result: Result<T>,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files: {} ok, {} failed in {:.3}s",
            self.total, self.succeeded, self.failed, self.elapsed_secs
        )
    }
}

pub struct BatchResult<T> {
    pub outcomes: Vec<FileOutcome<T>>,
    pub summary: BatchSummary,
}

pub struct BatchDecoder {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl BatchDecoder {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("wavdecode-{}", i))
            .build()
            .map_err(|e| DecodeError::config(format!("Failed to build thread pool: {}", e)))?;

        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `job` to every path in parallel. Outcomes keep input order.
    pub fn run<T, F>(&self, paths: &[PathBuf], job: F) -> BatchResult<T>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync,
    {
        let start = Instant::now();
        log::debug!("Processing {} files on {} workers", paths.len(), self.workers);

        let outcomes: Vec<FileOutcome<T>> = self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let file_start = Instant::now();
                    let result = job(path);
                    if let Err(e) = &result {
                        log::warn!("{}: {}", path.display(), e);
                    }
                    FileOutcome {
                        path: path.clone(),
                        result,
                        elapsed_ms: file_start.elapsed().as_secs_f64() * 1000.0,
                    }
                })
                .collect()
        });

        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        let summary = BatchSummary {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };

        BatchResult { outcomes, summary }
    }

    pub fn decode_all(&self, paths: &[PathBuf]) -> BatchResult<DecodedAudio> {
        self.run(paths, |path| audio::decode(path))
    }
}
