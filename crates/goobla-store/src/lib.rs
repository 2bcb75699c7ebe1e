//! Goobla Store - addressing layer of the local model store.
//!
//! Turns human-readable model references such as `research/llama:13b` into
//! structured identities, and identities or digests into the on-disk paths
//! of manifests and content-addressed blobs. No network access and no blob
//! contents are involved; the only side effect is creating directories.
//!
//! # Example
//!
//! ```rust,no_run
//! use goobla_store::{FixedRoot, ModelIdentity, PathResolver};
//!
//! fn main() -> goobla_store::Result<()> {
//!     let resolver = PathResolver::with_root(FixedRoot::new("/var/lib/goobla/models"));
//!
//!     let identity = ModelIdentity::parse("llama:7b");
//!     assert_eq!(identity.short_tag_name(), "llama:7b");
//!
//!     let manifest = resolver.manifest_path(&identity)?;
//!     println!("manifest: {}", manifest.display());
//!
//!     let digest = format!("sha256:{}", "a".repeat(64));
//!     println!("blob: {}", resolver.blob_path(&digest)?.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod layout;
pub mod names;
pub mod reference;
pub mod resolver;
pub mod root;

// Re-export commonly used types
pub use config::{PathsConfig, ReferenceConfig, ReferenceDefaults};
pub use digest::{is_valid_digest, Digest};
pub use error::{Result, StoreError};
pub use layout::{ensure_dir, BlobLocation, StoreLayout};
pub use names::{ModelName, NamePolicy, StandardNamePolicy};
pub use reference::{ModelIdentity, ReferenceParser};
pub use resolver::PathResolver;
pub use root::{EnvRoot, FixedRoot, StoreRoot};
