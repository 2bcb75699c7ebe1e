//! SHA-256 blob digests.
//!
//! Only `sha256` digests are accepted, written as `sha256:<hex>` or
//! `sha256-<hex>` with 64 hex characters of either case. On disk the
//! canonical form always uses `-`.

use crate::config::PathsConfig;
use crate::error::{Result, StoreError};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// Prefix of the canonical on-disk form.
const CANONICAL_PREFIX: &str = "sha256-";

static DIGEST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sha256[:-][0-9a-fA-F]{64}$").unwrap());

/// Returns true if `digest` is a well-formed sha256 digest.
pub fn is_valid_digest(digest: &str) -> bool {
    DIGEST_PATTERN.is_match(digest)
}

/// A validated sha256 digest held in canonical `sha256-<hex>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    canonical: String,
}

impl Digest {
    /// Validate `digest` and convert it to canonical form.
    ///
    /// Hex case is preserved; only the separator is normalized.
    pub fn parse(digest: &str) -> Result<Self> {
        if !is_valid_digest(digest) {
            return Err(StoreError::InvalidDigestFormat {
                digest: digest.to_string(),
            });
        }
        Ok(Self {
            canonical: digest.replace(':', "-"),
        })
    }

    /// Recognise a blob file name, which is always in canonical form.
    pub fn from_canonical_file_name(name: &str) -> Option<Self> {
        if name.starts_with(CANONICAL_PREFIX) && is_valid_digest(name) {
            Some(Self {
                canonical: name.to_string(),
            })
        } else {
            None
        }
    }

    /// The `sha256-<hex>` form used for blob file names.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The 64 hex characters without the algorithm prefix.
    pub fn hex(&self) -> &str {
        &self.canonical[CANONICAL_PREFIX.len()..]
    }

    /// Shard directory name for this digest.
    pub fn shard(&self) -> &str {
        &self.hex()[..PathsConfig::SHARD_PREFIX_LEN]
    }
}

impl FromStr for Digest {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}
