//! Build specification types
//!
//! A [`BuildSpec`] is owned by the pipeline configuration and read-only
//! during a run: context directory, target stage, and the registry-hosted
//! cache refs the executor consults and updates.

use super::errors::ValidationError;
use super::types::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Cache export mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Export only the final layers (engine default)
    #[default]
    Min,
    /// Export all intermediate layers as well
    Max,
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// Destination for the build-cache export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheExport {
    /// Registry ref the cache metadata is written to
    #[serde(rename = "ref")]
    pub cache_ref: String,

    /// Export mode
    #[serde(default)]
    pub mode: CacheMode,
}

/// Specification of one image build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Build context directory, relative to the working directory
    #[serde(default = "default_context")]
    pub context: PathBuf,

    /// Target stage to build; intermediate stages are never published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Registry ref layer cache is read from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_from: Option<String>,

    /// Cache export destination, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_to: Option<CacheExport>,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            context: default_context(),
            target: None,
            cache_from: None,
            cache_to: None,
        }
    }
}

impl BuildSpec {
    /// Target stage name, or the conventional name for "the whole file"
    #[must_use]
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or("default")
    }
}

impl Validate for BuildSpec {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.context.as_os_str().is_empty() {
            return Err(ValidationError::EmptyBuildContext);
        }

        if let Some(ref export) = self.cache_to {
            if export.cache_ref.is_empty() {
                return Err(ValidationError::EmptyCacheRef);
            }
        }

        Ok(())
    }
}
