//! Pipeline execution layer
//!
//! This module contains the orchestrator and the build/publish seams it
//! drives, plus the concrete docker-backed implementations.

mod docker;
mod dry_run;
mod orchestrator;
mod traits;

pub use docker::{DockerBuildExecutor, DockerPublisher};
pub use dry_run::{NoopBuilder, NoopPublisher};
pub use orchestrator::{Orchestrator, RunReport};
pub use traits::{HealthStatus, ImageBuilder, ImageHandle, PublishResult, Publisher, RunContext};
