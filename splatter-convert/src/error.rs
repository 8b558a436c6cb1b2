//! Error types for the conversion pipeline.

use rand::distributions::WeightedError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before or during a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("sample count must be greater than zero")]
    ZeroSampleCount,

    #[error("opacity must be within [0, 1], got {0}")]
    InvalidOpacity(f32),

    #[error("cannot build face distribution: {0}")]
    Distribution(#[from] WeightedError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading a splat stream back.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{len} bytes is not a whole number of {record_size}-byte records")]
    TrailingBytes { len: usize, record_size: usize },
}
