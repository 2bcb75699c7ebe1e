//! Store root resolution.
//!
//! The models directory holds `manifests/` and `blobs/`. Where it lives is
//! decided by a [`StoreRoot`] so tests and embedders can pin it.

use crate::config::PathsConfig;
use crate::error::{Result, StoreError};
use std::path::PathBuf;

/// Provides the base directory for manifests and blobs.
pub trait StoreRoot: Send + Sync {
    fn models_dir(&self) -> Result<PathBuf>;
}

/// A root fixed at construction time.
#[derive(Debug, Clone)]
pub struct FixedRoot(pub PathBuf);

impl FixedRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl StoreRoot for FixedRoot {
    fn models_dir(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Root taken from the environment.
///
/// # Resolution order
/// 1. `$GOOBLA_MODELS` when set and non-empty
/// 2. `~/.goobla/models`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvRoot;

impl StoreRoot for EnvRoot {
    fn models_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(PathsConfig::MODELS_ENV_VAR) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let home = dirs::home_dir().ok_or_else(|| StoreError::StoreRootUnavailable {
            message: format!(
                "could not determine home directory and {} is not set",
                PathsConfig::MODELS_ENV_VAR
            ),
        })?;
        Ok(home
            .join(PathsConfig::STORE_DIR_NAME)
            .join(PathsConfig::MODELS_DIR_NAME))
    }
}

impl<T: StoreRoot + ?Sized> StoreRoot for &T {
    fn models_dir(&self) -> Result<PathBuf> {
        (**self).models_dir()
    }
}

impl<T: StoreRoot + ?Sized> StoreRoot for Box<T> {
    fn models_dir(&self) -> Result<PathBuf> {
        (**self).models_dir()
    }
}
