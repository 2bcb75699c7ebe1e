//! Error types for the model store addressing layer.
//!
//! Every failure is returned to the caller. Nothing in this crate logs or
//! retries an error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The reference can never resolve to a manifest.
    #[error("model {name} does not exist: invalid model name")]
    InvalidIdentity { name: String },

    #[error("invalid digest format: {digest:?}")]
    InvalidDigestFormat { digest: String },

    #[error("failed to create directory {path:?}: {source}: ensure path elements are traversable")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("models directory unavailable: {message}")]
    StoreRootUnavailable { message: String },

    #[error("invalid protocol scheme: {scheme}")]
    InvalidProtocol { scheme: String },

    #[error("insecure protocol http")]
    InsecureProtocol,

    #[error("invalid registry url {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<walkdir::Error> for StoreError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let message = err.to_string();
        StoreError::Io {
            message,
            path,
            source: err.into_io_error(),
        }
    }
}

impl StoreError {
    /// Wrap a failed `create_dir_all` for `path`.
    pub fn directory_create(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        StoreError::DirectoryCreateFailed {
            path: path.into(),
            source: err,
        }
    }

    /// The closest `std::io::ErrorKind` for this error.
    ///
    /// An invalid identity reports `NotFound` so callers can treat it the
    /// same way as a missing manifest file.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            StoreError::InvalidIdentity { .. } => std::io::ErrorKind::NotFound,
            StoreError::InvalidDigestFormat { .. }
            | StoreError::InvalidProtocol { .. }
            | StoreError::InsecureProtocol
            | StoreError::InvalidBaseUrl { .. } => std::io::ErrorKind::InvalidInput,
            StoreError::DirectoryCreateFailed { source, .. } => source.kind(),
            StoreError::Io {
                source: Some(source),
                ..
            } => source.kind(),
            StoreError::StoreRootUnavailable { .. } | StoreError::Io { .. } => {
                std::io::ErrorKind::Other
            }
        }
    }

    /// Check if this error means "no such model".
    pub fn is_not_found(&self) -> bool {
        self.kind() == std::io::ErrorKind::NotFound
    }
}
