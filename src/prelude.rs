//! Prelude module for common imports

// Re-export all pipeline types with full paths
pub use crate::pipeline::build::{BuildSpec, CacheExport, CacheMode};
pub use crate::pipeline::credentials::{Credentials, Secret};
pub use crate::pipeline::errors::{PipelineError, ValidationError};
pub use crate::pipeline::event::{EventDescriptor, EventKind};
pub use crate::pipeline::tags::{ImageIdentity, ResolvedMetadata, TagRule, resolve};
pub use crate::pipeline::trigger::TriggerConfig;
pub use crate::pipeline::types::{PipelineResult, RunState, Validate};

// Re-export executor types
pub use crate::executor::{
    DockerBuildExecutor, DockerPublisher, HealthStatus, ImageBuilder, ImageHandle, NoopBuilder,
    NoopPublisher, Orchestrator, PublishResult, Publisher, RunContext, RunReport,
};

// Re-export infrastructure types
pub use crate::infrastructure::{PipelineConfig, init_logging};
