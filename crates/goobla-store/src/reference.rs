//! Model reference parsing.
//!
//! A reference such as `https://example.com/research/llama:13b` decomposes
//! into protocol scheme, registry, namespace, repository and tag. Anything
//! the string leaves out is filled from [`ReferenceDefaults`], so a bare
//! `llama` resolves to `registry.goobla.ai/library/llama:latest`.
//!
//! Parsing never fails. Whether the result names a real manifest is
//! decided later by a [`crate::NamePolicy`].

use crate::config::{ReferenceConfig, ReferenceDefaults};
use crate::error::{Result, StoreError};
use crate::names::ModelName;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::MAIN_SEPARATOR;
use std::str::FromStr;
use url::Url;

/// Structured identity of a model reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelIdentity {
    pub protocol_scheme: String,
    pub registry: String,
    pub namespace: String,
    /// Empty when the reference had no usable repository segment.
    pub repository: String,
    pub tag: String,
}

/// Parses reference strings against a set of defaults.
#[derive(Debug, Clone, Default)]
pub struct ReferenceParser {
    defaults: ReferenceDefaults,
}

impl ReferenceParser {
    pub fn new(defaults: ReferenceDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ReferenceDefaults {
        &self.defaults
    }

    /// Decompose `raw` into a [`ModelIdentity`].
    ///
    /// 1. A `://` splits off the protocol scheme.
    /// 2. OS path separators become `/`.
    /// 3. Three segments are registry/namespace/repository, two are
    ///    namespace/repository, one is the repository. Any other count
    ///    leaves the repository empty.
    /// 4. The first `:` in the repository splits off the tag.
    pub fn parse(&self, raw: &str) -> ModelIdentity {
        let mut identity = ModelIdentity {
            protocol_scheme: self.defaults.protocol_scheme.clone(),
            registry: self.defaults.registry.clone(),
            namespace: self.defaults.namespace.clone(),
            repository: String::new(),
            tag: self.defaults.tag.clone(),
        };

        let mut rest = raw;
        if let Some((scheme, after)) = raw.split_once("://") {
            identity.protocol_scheme = scheme.to_string();
            rest = after;
        }

        let rest = rest.replace(MAIN_SEPARATOR, "/");
        let parts: Vec<&str> = rest.split('/').collect();
        match parts.as_slice() {
            [registry, namespace, repository] => {
                identity.registry = registry.to_string();
                identity.namespace = namespace.to_string();
                identity.repository = repository.to_string();
            }
            [namespace, repository] => {
                identity.namespace = namespace.to_string();
                identity.repository = repository.to_string();
            }
            [repository] => {
                identity.repository = repository.to_string();
            }
            _ => {}
        }

        if let Some((repository, tag)) = identity.repository.split_once(':') {
            let (repository, tag) = (repository.to_string(), tag.to_string());
            identity.repository = repository;
            identity.tag = tag;
        }

        identity
    }
}

impl ModelIdentity {
    /// Parse `raw` with the standard defaults.
    pub fn parse(raw: &str) -> Self {
        ReferenceParser::default().parse(raw)
    }

    /// `{namespace}/{repository}`
    pub fn namespace_repository(&self) -> String {
        format!("{}/{}", self.namespace, self.repository)
    }

    /// `{registry}/{namespace}/{repository}:{tag}`, the canonical unique key.
    pub fn full_tag_name(&self) -> String {
        format!(
            "{}/{}/{}:{}",
            self.registry, self.namespace, self.repository, self.tag
        )
    }

    /// Shortest display form relative to the standard defaults.
    pub fn short_tag_name(&self) -> String {
        self.short_tag_name_relative_to(&ReferenceDefaults::default())
    }

    /// Shortest display form relative to `defaults`.
    ///
    /// The registry is dropped when it is the default, and the namespace is
    /// dropped as well when both are defaults. A non-default registry always
    /// yields the fully qualified name.
    pub fn short_tag_name_relative_to(&self, defaults: &ReferenceDefaults) -> String {
        if self.registry != defaults.registry {
            return self.full_tag_name();
        }
        if self.namespace == defaults.namespace {
            format!("{}:{}", self.repository, self.tag)
        } else {
            format!("{}/{}:{}", self.namespace, self.repository, self.tag)
        }
    }

    /// Network endpoint base for the registry, e.g. `https://registry.goobla.ai/`.
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("{}://{}", self.protocol_scheme, self.registry);
        Url::parse(&raw).map_err(|source| StoreError::InvalidBaseUrl { url: raw, source })
    }

    /// Reject protocol schemes the registry client must not use.
    ///
    /// `https` always passes, `http` only when `allow_insecure` is set.
    pub fn check_protocol(&self, allow_insecure: bool) -> Result<()> {
        match self.protocol_scheme.as_str() {
            ReferenceConfig::DEFAULT_PROTOCOL_SCHEME => Ok(()),
            ReferenceConfig::INSECURE_PROTOCOL_SCHEME if allow_insecure => Ok(()),
            ReferenceConfig::INSECURE_PROTOCOL_SCHEME => Err(StoreError::InsecureProtocol),
            other => Err(StoreError::InvalidProtocol {
                scheme: other.to_string(),
            }),
        }
    }

    /// The name handed to the validity predicate.
    pub fn model_name(&self) -> ModelName {
        ModelName {
            host: self.registry.clone(),
            namespace: self.namespace.clone(),
            model: self.repository.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl FromStr for ModelIdentity {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_tag_name())
    }
}
