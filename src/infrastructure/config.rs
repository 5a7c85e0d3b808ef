//! Pipeline configuration
//!
//! Loads the declarative pipeline definition from YAML. The file holds the
//! triggers, tag rules, and build spec; credentials never appear in it and
//! are injected separately at run time.

use crate::pipeline::{
    BuildSpec, ImageIdentity, TagRule, TriggerConfig, Validate, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative definition of one build-and-publish pipeline
///
/// ```yaml
/// image: api
/// registry: ghcr.io/acme
/// source_url: https://example.com/acme/api
/// triggers:
///   branches: [main, deploy-*]
///   tags: ["v*.*.*"]
/// tag_rules: [semver, ref, sha]
/// build:
///   target: runtime
///   cache_from: ghcr.io/acme/api:buildcache
///   cache_to:
///     ref: ghcr.io/acme/api:buildcache
///     mode: max
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Short image name
    pub image: String,

    /// Registry host plus owner path (`<registry>/<owner>`)
    pub registry: String,

    /// Source repository URL, stamped into the image labels
    pub source_url: String,

    /// Which events start a run
    pub triggers: TriggerConfig,

    /// Ordered tag-derivation rules
    pub tag_rules: Vec<TagRule>,

    /// Build specification
    #[serde(default)]
    pub build: BuildSpec,
}

impl PipelineConfig {
    /// Loads and validates a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, is not valid YAML for
    /// this shape, or fails validation.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing pipeline config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating pipeline config {}", path.display()))?;
        Ok(config)
    }

    /// Full repository path the image is published under
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.registry, self.image)
    }

    /// Static identity used for image labels
    #[must_use]
    pub fn identity(&self) -> ImageIdentity {
        ImageIdentity {
            name: self.image.clone(),
            source_url: self.source_url.clone(),
        }
    }
}

impl Validate for PipelineConfig {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.image.is_empty() {
            return Err(ValidationError::EmptyImageName);
        }
        if self.registry.is_empty() {
            return Err(ValidationError::EmptyRegistry);
        }
        if self.tag_rules.is_empty() {
            return Err(ValidationError::NoTagRules);
        }
        self.triggers.validate()?;
        self.build.validate()?;
        Ok(())
    }
}
