//! Manifest and blob path resolution.
//!
//! [`PathResolver`] combines a [`StoreRoot`], a [`NamePolicy`] and the pure
//! [`StoreLayout`] into the paths every other part of the store agrees on.
//! Resolution is stateless: nothing is cached between calls and the only
//! side effect is idempotent directory creation.

use crate::config::ReferenceConfig;
use crate::digest::Digest;
use crate::error::{Result, StoreError};
use crate::layout::{ensure_dir, BlobLocation, StoreLayout};
use crate::names::{NamePolicy, StandardNamePolicy};
use crate::reference::ModelIdentity;
use crate::root::{EnvRoot, StoreRoot};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Number of path components below `manifests/` for a manifest file.
const MANIFEST_DEPTH: usize = 4;

/// Resolves model identities and digests to on-disk paths.
#[derive(Debug, Clone, Default)]
pub struct PathResolver<R = EnvRoot, P = StandardNamePolicy> {
    root: R,
    policy: P,
}

impl<R: StoreRoot> PathResolver<R, StandardNamePolicy> {
    /// Resolver over `root` using the standard naming rules.
    pub fn with_root(root: R) -> Self {
        Self::new(root, StandardNamePolicy)
    }
}

impl<R: StoreRoot, P: NamePolicy> PathResolver<R, P> {
    pub fn new(root: R, policy: P) -> Self {
        Self { root, policy }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn layout(&self) -> Result<StoreLayout> {
        Ok(StoreLayout::new(self.root.models_dir()?))
    }

    /// Path of the manifest for `identity`.
    ///
    /// Fails with [`StoreError::InvalidIdentity`] (a "not found" error)
    /// before consulting the store root when the name policy rejects the
    /// identity. The manifest directory is not created; writers own that.
    pub fn manifest_path(&self, identity: &ModelIdentity) -> Result<PathBuf> {
        let name = identity.model_name();
        if !self.policy.is_valid(&name) {
            return Err(StoreError::InvalidIdentity {
                name: name.to_string(),
            });
        }

        Ok(self.layout()?.manifest_path(&name, &self.policy))
    }

    /// `<models>/manifests`, created if absent.
    pub fn manifests_dir(&self) -> Result<PathBuf> {
        let path = self.layout()?.manifests_dir();
        ensure_dir(&path)?;
        Ok(path)
    }

    /// `<models>/blobs`, created if absent.
    pub fn blobs_dir(&self) -> Result<PathBuf> {
        let path = self.layout()?.blobs_dir();
        ensure_dir(&path)?;
        Ok(path)
    }

    /// Path of the blob for `digest`.
    ///
    /// An empty digest resolves to the blobs directory itself. Any other
    /// value must be a `sha256:`/`sha256-` digest, checked before the
    /// filesystem is touched.
    pub fn blob_path(&self, digest: &str) -> Result<PathBuf> {
        if digest.is_empty() {
            return self.blobs_dir();
        }
        Ok(self.blob_location(digest)?.into_path())
    }

    /// Like [`PathResolver::blob_path`] but reports which layout answered.
    ///
    /// Unlike `blob_path`, an empty digest is not special here and fails
    /// with [`StoreError::InvalidDigestFormat`]; use
    /// [`PathResolver::blobs_dir`] for the blobs root.
    ///
    /// The shard directory is always created. A blob already present at the
    /// legacy flat path is returned from there until it is rewritten.
    pub fn blob_location(&self, digest: &str) -> Result<BlobLocation> {
        let digest = Digest::parse(digest)?;
        let layout = self.layout()?;

        let sharded = layout.sharded_blob_path(&digest);
        if let Some(shard_dir) = sharded.parent() {
            ensure_dir(shard_dir)?;
        }

        let location = layout.locate_blob(&digest, Path::exists);
        if location.is_legacy() {
            debug!(
                "Using legacy blob path for {}: {}",
                digest,
                location.path().display()
            );
        }
        Ok(location)
    }

    /// Every blob in the store, from both layouts, sorted by digest.
    ///
    /// Files whose names are not canonical digests (partial downloads,
    /// stray files) are skipped. A digest present in both layouts is
    /// reported once, at the location [`PathResolver::blob_location`] would
    /// pick.
    pub fn list_blobs(&self) -> Result<Vec<(Digest, BlobLocation)>> {
        let layout = self.layout()?;
        let blobs_dir = layout.blobs_dir();
        if !blobs_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut blobs: Vec<(Digest, BlobLocation)> = Vec::new();
        for entry in WalkDir::new(&blobs_dir).min_depth(1).max_depth(2) {
            let entry = entry?;
            // Follows symlinks so linked blobs are listed like `blob_location` sees them.
            if !entry.path().is_file() {
                continue;
            }
            let Some(digest) = entry
                .file_name()
                .to_str()
                .and_then(Digest::from_canonical_file_name)
            else {
                continue;
            };

            let location = match entry.depth() {
                1 => BlobLocation::Legacy(entry.into_path()),
                _ if entry.path().parent() == layout.sharded_blob_path(&digest).parent() => {
                    BlobLocation::Sharded(entry.into_path())
                }
                _ => {
                    debug!("Skipping misplaced blob {}", entry.path().display());
                    continue;
                }
            };
            blobs.push((digest, location));
        }

        // Legacy sorts before Sharded for the same digest, so dedup keeps it.
        blobs.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.is_legacy().cmp(&a.1.is_legacy()))
        });
        blobs.dedup_by(|later, earlier| later.0 == earlier.0);
        Ok(blobs)
    }

    /// Every manifest in the store as an identity, sorted by full tag name.
    ///
    /// Only files exactly `host/namespace/model/tag` deep are considered,
    /// and only names the policy accepts are returned.
    pub fn list_manifests(&self) -> Result<Vec<ModelIdentity>> {
        let layout = self.layout()?;
        let manifests_dir = layout.manifests_dir();
        if !manifests_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut identities = Vec::new();
        for entry in WalkDir::new(&manifests_dir)
            .min_depth(MANIFEST_DEPTH)
            .max_depth(MANIFEST_DEPTH)
        {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&manifests_dir) else {
                continue;
            };
            let parts: Vec<&str> = relative.iter().filter_map(|p| p.to_str()).collect();
            let [registry, namespace, repository, tag] = parts.as_slice() else {
                continue;
            };

            let identity = ModelIdentity {
                protocol_scheme: ReferenceConfig::DEFAULT_PROTOCOL_SCHEME.to_string(),
                registry: registry.to_string(),
                namespace: namespace.to_string(),
                repository: repository.to_string(),
                tag: tag.to_string(),
            };
            if self.policy.is_valid(&identity.model_name()) {
                identities.push(identity);
            } else {
                debug!("Skipping manifest with invalid name: {}", relative.display());
            }
        }

        identities.sort_by_key(|identity| identity.full_tag_name());
        Ok(identities)
    }
}
