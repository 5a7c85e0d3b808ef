//! No-op builder and publisher for dry runs
//!
//! Walk the full state machine without touching an engine or a registry,
//! logging what a real run would do.

use crate::executor::traits::{HealthStatus, ImageBuilder, ImageHandle, PublishResult, Publisher};
use crate::pipeline::{BuildSpec, Credentials, PipelineError, ResolvedMetadata};
use std::path::Path;

/// Builder that only logs the build it would perform
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBuilder;

impl ImageBuilder for NoopBuilder {
    fn build(
        &self,
        spec: &BuildSpec,
        metadata: &ResolvedMetadata,
        working_dir: &Path,
    ) -> Result<ImageHandle, PipelineError> {
        tracing::info!(
            target = %spec.target_name(),
            context = %spec.context.display(),
            working_dir = %working_dir.display(),
            labels = metadata.labels.len(),
            "Would build image"
        );
        Ok(ImageHandle::new("dry-run:none"))
    }

    fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// Publisher that only logs the pushes it would perform
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn login(&self, credentials: &Credentials) -> Result<(), PipelineError> {
        tracing::info!(registry = %credentials.registry, "Would authenticate");
        Ok(())
    }

    fn publish(
        &self,
        _image: &ImageHandle,
        metadata: &ResolvedMetadata,
        repository: &str,
    ) -> Result<PublishResult, PipelineError> {
        let pushed = metadata.qualified_refs(repository);
        for tag in &pushed {
            tracing::info!(tag = %tag, "Would push tag");
        }
        Ok(PublishResult { pushed })
    }
}
