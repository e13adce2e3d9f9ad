use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A store already exists at '{}'", path.display())]
    StoreAlreadyExists { path: PathBuf },

    #[error("'{}' is not a trajectory store (missing manifest)", path.display())]
    NotAStore { path: PathBuf },

    #[error("The store has been closed; no further writes are permitted")]
    WriteAfterClose,

    #[error("Simulation parameters have already been written")]
    ParametersAlreadyWritten,

    #[error("Simulation parameters must be written before any snapshot")]
    ParametersNotWritten,

    #[error("Snapshot index {index} is invalid; indices start at 1 and must increase (last written: {last:?})")]
    SnapshotOutOfOrder { index: u64, last: Option<u64> },

    #[error("Table '{}' not found", path.display())]
    TableNotFound { path: PathBuf },

    #[error("Table '{}' does not match the expected schema: {reason}", path.display())]
    SchemaMismatch { path: PathBuf, reason: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parquet error on '{}': {source}", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },

    #[error("Arrow error on '{}': {source}", path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: ArrowError,
    },

    #[error("Manifest error on '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }

    pub(crate) fn parquet(path: impl Into<PathBuf>) -> impl FnOnce(ParquetError) -> Self {
        let path = path.into();
        move |source| StoreError::Parquet { path, source }
    }

    pub(crate) fn arrow(path: impl Into<PathBuf>) -> impl FnOnce(ArrowError) -> Self {
        let path = path.into();
        move |source| StoreError::Arrow { path, source }
    }
}
