//! Error types for the command-line application.

use splatter_convert::{ConvertError, DecodeError};
use splatter_data::{LoadError, PlyError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end a `splatter` invocation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("PLY error: {0}")]
    Ply(#[from] PlyError),

    #[error("Decode error in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} inputs failed")]
    BatchFailed { failed: usize, total: usize },
}
