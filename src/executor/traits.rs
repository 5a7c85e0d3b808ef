//! Execution traits
//!
//! This module defines the seams between the orchestrator and the concrete
//! container engine: building an image and publishing it.

use crate::pipeline::{BuildSpec, Credentials, PipelineError, ResolvedMetadata};
use std::path::{Path, PathBuf};

/// Handle to a successfully built image
///
/// The image exists in the engine's local store under `local_ref`; the
/// digest is known once the engine reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// Engine-local reference the built image was tagged with
    pub local_ref: String,

    /// Content digest reported by the engine, when available
    pub digest: Option<String>,
}

impl ImageHandle {
    /// Creates a handle for a locally stored image
    pub fn new(local_ref: impl Into<String>) -> Self {
        Self {
            local_ref: local_ref.into(),
            digest: None,
        }
    }

    /// Attaches the content digest
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

/// Outcome of a publish step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Fully qualified refs pushed, in push order
    pub pushed: Vec<String>,
}

/// Builds container images
///
/// The registry-hosted cache consulted by implementations is a best-effort
/// optimization: an unreachable cache source must never fail the build.
#[allow(clippy::missing_errors_doc)]
pub trait ImageBuilder: Send + Sync {
    /// Builds the target stage and returns a handle to the local image
    ///
    /// Labels from `metadata` are baked into the image; build errors are
    /// fatal and no partial image may remain tagged.
    fn build(
        &self,
        spec: &BuildSpec,
        metadata: &ResolvedMetadata,
        working_dir: &Path,
    ) -> Result<ImageHandle, PipelineError>;

    /// Probes whether the underlying engine is usable
    fn health_check(&self) -> HealthStatus;
}

/// Publishes built images to a registry
#[allow(clippy::missing_errors_doc)]
pub trait Publisher: Send + Sync {
    /// Authenticates to the registry
    ///
    /// Idempotent: a second login with the same credentials is a no-op
    /// success. Must be called before any push.
    fn login(&self, credentials: &Credentials) -> Result<(), PipelineError>;

    /// Pushes the image once per resolved tag, fail-fast
    ///
    /// All pushes point at the same digest; the first failing tag aborts the
    /// remaining pushes.
    fn publish(
        &self,
        image: &ImageHandle,
        metadata: &ResolvedMetadata,
        repository: &str,
    ) -> Result<PublishResult, PipelineError>;
}

/// Health status of a build engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Engine is available
    Healthy,
    /// Engine responds but some functionality may be missing
    Degraded {
        /// Reason for degradation
        reason: String,
    },
    /// Engine is unusable
    Unhealthy {
        /// Reason for being unhealthy
        reason: String,
    },
}

impl HealthStatus {
    /// Returns true if the engine can be used for a run
    #[must_use]
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Unhealthy { .. })
    }
}

/// Immutable context for one pipeline run
///
/// Carries everything a run needs from its surroundings so that components
/// never read the process environment ad hoc.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique run identifier
    pub run_id: String,

    /// Directory the build context is resolved against
    pub working_dir: PathBuf,

    /// Registry credentials for this run
    pub credentials: Credentials,
}

impl RunContext {
    /// Creates a run context with a fresh run id
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            working_dir: working_dir.into(),
            credentials,
        }
    }
}
