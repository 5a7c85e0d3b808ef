//! # Shipwright - A Build-and-Publish Pipeline Engine
//!
//! Shipwright executes declarative build-and-publish pipelines for container
//! images: an incoming repository event is matched against trigger patterns,
//! image tags and OCI labels are derived by ordered rules, the image is built
//! with a registry-hosted layer cache, and the result is pushed under every
//! resolved tag.
//!
//! ## Quick Start
//!
//! ```no_run
//! use shipwright::executor::{NoopBuilder, NoopPublisher, Orchestrator, RunContext};
//! use shipwright::infrastructure::PipelineConfig;
//! use shipwright::pipeline::{Credentials, EventDescriptor};
//!
//! let config = PipelineConfig::load(std::path::Path::new("shipwright.yml")).unwrap();
//! let context = RunContext::new(".", Credentials::new("ghcr.io", "octo", "token"));
//! let orchestrator = Orchestrator::new(config, NoopBuilder, NoopPublisher, context);
//! let report = orchestrator.run(&EventDescriptor::tag("v1.2.3", "<sha>"));
//! assert!(report.is_success());
//! ```
//!
//! ## Features
//!
//! - **Declarative triggers**: branch and tag globs gate execution
//! - **Composable tag rules**: semver, ref, and sha rules evaluated in order
//! - **Cache-aware builds**: registry cache consulted as a best-effort
//!   optimization, never a correctness dependency
//! - **Fail-fast publishing**: one login per run, one push per resolved tag
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod executor;
pub mod infrastructure;
pub mod pipeline;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use executor::{
    DockerBuildExecutor, DockerPublisher, HealthStatus, ImageBuilder, ImageHandle, NoopBuilder,
    NoopPublisher, Orchestrator, PublishResult, Publisher, RunContext, RunReport,
};
pub use infrastructure::{PipelineConfig, event_from_env, init_logging};
pub use pipeline::{
    BuildSpec, CacheExport, CacheMode, Credentials, EventDescriptor, EventKind, ImageIdentity,
    PipelineError, ResolvedMetadata, RunState, Secret, TagRule, TriggerConfig, Validate,
    ValidationError, resolve,
};

/// Version of the shipwright crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
