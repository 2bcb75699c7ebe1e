//! Pure path derivation for the on-disk store.
//!
//! ```text
//! <models>/
//!   manifests/<host>/<namespace>/<model>/<tag>
//!   blobs/<hex[..2]>/sha256-<hex>     sharded layout
//!   blobs/sha256-<hex>                legacy flat layout
//! ```
//!
//! Nothing here touches the filesystem except [`ensure_dir`]. Blob lookup
//! takes an existence probe so the legacy/sharded policy can be exercised
//! without a real directory tree.

use crate::config::PathsConfig;
use crate::digest::Digest;
use crate::error::{Result, StoreError};
use crate::names::{ModelName, NamePolicy};
use std::path::{Path, PathBuf};

/// Where a blob lives (or will live).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobLocation {
    /// Found at the flat pre-sharding path.
    Legacy(PathBuf),
    /// The canonical sharded path, whether or not the file exists yet.
    Sharded(PathBuf),
}

impl BlobLocation {
    pub fn path(&self) -> &Path {
        match self {
            BlobLocation::Legacy(path) | BlobLocation::Sharded(path) => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            BlobLocation::Legacy(path) | BlobLocation::Sharded(path) => path,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, BlobLocation::Legacy(_))
    }
}

/// Directory layout below a models root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    models_dir: PathBuf,
}

impl StoreLayout {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.models_dir.join(PathsConfig::MANIFESTS_DIR_NAME)
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.models_dir.join(PathsConfig::BLOBS_DIR_NAME)
    }

    /// Manifest file for an already validated name.
    pub fn manifest_path(&self, name: &ModelName, policy: &dyn NamePolicy) -> PathBuf {
        self.manifests_dir().join(policy.filepath(name))
    }

    /// `blobs/<shard>/sha256-<hex>`
    pub fn sharded_blob_path(&self, digest: &Digest) -> PathBuf {
        self.blobs_dir()
            .join(digest.shard())
            .join(digest.canonical())
    }

    /// `blobs/sha256-<hex>`
    pub fn legacy_blob_path(&self, digest: &Digest) -> PathBuf {
        self.blobs_dir().join(digest.canonical())
    }

    /// Pick the blob location for `digest`.
    ///
    /// The legacy path wins whenever `exists` reports it, even if a sharded
    /// copy is also present. Otherwise the sharded path is returned.
    pub fn locate_blob(&self, digest: &Digest, exists: impl Fn(&Path) -> bool) -> BlobLocation {
        let legacy = self.legacy_blob_path(digest);
        if exists(&legacy) {
            BlobLocation::Legacy(legacy)
        } else {
            BlobLocation::Sharded(self.sharded_blob_path(digest))
        }
    }
}

/// Create `path` and its parents if missing.
///
/// Creating an existing directory is not an error. Fails with
/// [`StoreError::DirectoryCreateFailed`] when any component is not a
/// traversable directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PathsConfig::DIR_MODE);
    }

    builder
        .create(path)
        .map_err(|e| StoreError::directory_create(e, path))
}
