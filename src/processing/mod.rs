//! Multi-file processing

pub mod batch;

pub use batch::{BatchDecoder, BatchResult, BatchSummary, FileOutcome};
