//! Model name validity and manifest sub-path encoding.
//!
//! The resolver consumes these through the [`NamePolicy`] trait so the
//! rules can be swapped without touching path resolution.

use std::path::PathBuf;

const MAX_HOST_LENGTH: usize = 350;
const MAX_PART_LENGTH: usize = 80;

/// A fully qualified model name as seen by the validity predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelName {
    pub host: String,
    pub namespace: String,
    pub model: String,
    pub tag: String,
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}:{}", self.host, self.namespace, self.model, self.tag)
    }
}

/// Decides which names may address a manifest and where it lives.
pub trait NamePolicy: Send + Sync {
    /// Whether the combination of parts is well-formed.
    fn is_valid(&self, name: &ModelName) -> bool;

    /// Nested sub-path of the manifest below the manifests directory.
    ///
    /// Only called for names that passed [`NamePolicy::is_valid`].
    fn filepath(&self, name: &ModelName) -> PathBuf {
        [&name.host, &name.namespace, &name.model, &name.tag]
            .iter()
            .collect()
    }
}

/// Default naming rules for registry hosted models.
///
/// | part      | max len | first char          | rest                |
/// |-----------|---------|---------------------|---------------------|
/// | host      | 350     | alphanumeric        | alnum `. _ : -`     |
/// | namespace | 80      | alphanumeric        | alnum `_ -`         |
/// | model     | 80      | alphanumeric        | alnum `. _ -`       |
/// | tag       | 80      | alphanumeric or `_` | alnum `. _ -`       |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNamePolicy;

fn is_valid_part(part: &str, max_len: usize, first: fn(char) -> bool, rest: &[char]) -> bool {
    let mut chars = part.chars();
    let Some(head) = chars.next() else {
        return false;
    };
    part.len() <= max_len
        && first(head)
        && chars.all(|c| c.is_ascii_alphanumeric() || rest.contains(&c))
}

impl NamePolicy for StandardNamePolicy {
    fn is_valid(&self, name: &ModelName) -> bool {
        let alnum = |c: char| c.is_ascii_alphanumeric();
        let alnum_or_underscore = |c: char| c.is_ascii_alphanumeric() || c == '_';

        is_valid_part(&name.host, MAX_HOST_LENGTH, alnum, &['.', '_', ':', '-'])
            && is_valid_part(&name.namespace, MAX_PART_LENGTH, alnum, &['_', '-'])
            && is_valid_part(&name.model, MAX_PART_LENGTH, alnum, &['.', '_', '-'])
            && is_valid_part(&name.tag, MAX_PART_LENGTH, alnum_or_underscore, &['.', '_', '-'])
    }
}
