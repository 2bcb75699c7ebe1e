//! Centralized configuration for the Goobla model store.
//!
//! Default reference components and on-disk directory names live here as
//! named constants so callers can compare against them (for example when
//! shortening a model name for display).

/// Defaults applied to model references that omit components.
pub struct ReferenceConfig;

impl ReferenceConfig {
    pub const DEFAULT_PROTOCOL_SCHEME: &'static str = "https";
    pub const INSECURE_PROTOCOL_SCHEME: &'static str = "http";
    pub const DEFAULT_REGISTRY: &'static str = "registry.goobla.ai";
    pub const DEFAULT_NAMESPACE: &'static str = "library";
    pub const DEFAULT_TAG: &'static str = "latest";
}

/// Store directory layout.
pub struct PathsConfig;

impl PathsConfig {
    pub const MANIFESTS_DIR_NAME: &'static str = "manifests";
    pub const BLOBS_DIR_NAME: &'static str = "blobs";
    pub const STORE_DIR_NAME: &'static str = ".goobla";
    pub const MODELS_DIR_NAME: &'static str = "models";
    pub const MODELS_ENV_VAR: &'static str = "GOOBLA_MODELS";
    /// Permissions for directories created by the resolver (unix only).
    pub const DIR_MODE: u32 = 0o755;
    /// Number of leading hex characters used as the blob shard directory.
    pub const SHARD_PREFIX_LEN: usize = 2;
}

/// Default values filled into a [`crate::ModelIdentity`] when the reference
/// string leaves a component out.
///
/// Passed explicitly to [`crate::ReferenceParser`] rather than read from
/// global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDefaults {
    pub protocol_scheme: String,
    pub registry: String,
    pub namespace: String,
    pub tag: String,
}

impl Default for ReferenceDefaults {
    fn default() -> Self {
        Self {
            protocol_scheme: ReferenceConfig::DEFAULT_PROTOCOL_SCHEME.to_string(),
            registry: ReferenceConfig::DEFAULT_REGISTRY.to_string(),
            namespace: ReferenceConfig::DEFAULT_NAMESPACE.to_string(),
            tag: ReferenceConfig::DEFAULT_TAG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults_match_constants() {
        let defaults = ReferenceDefaults::default();
        assert_eq!(defaults.protocol_scheme, "https");
        assert_eq!(defaults.registry, ReferenceConfig::DEFAULT_REGISTRY);
        assert_eq!(defaults.namespace, "library");
        assert_eq!(defaults.tag, "latest");
    }
}
