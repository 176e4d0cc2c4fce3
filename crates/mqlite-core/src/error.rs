use std::io;
use thiserror::Error;

/// Failures a [`LogStore`](crate::LogStore) backend can report.
///
/// Backends never report timeouts or "nothing available" through this type:
/// an empty fetch is an empty `Vec`, not an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
