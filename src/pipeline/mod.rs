//! Pipeline domain types and logic

// Make submodules public
pub mod build;
pub mod credentials;
pub mod errors;
pub mod event;
pub mod tags;
pub mod trigger;
pub mod types;

// Re-export public types from submodules
pub use build::{BuildSpec, CacheExport, CacheMode};
pub use credentials::{Credentials, Secret};
pub use errors::{PipelineError, ValidationError};
pub use event::{EventDescriptor, EventKind};
pub use tags::{ImageIdentity, ResolvedMetadata, TagRule, resolve};
pub use trigger::{TriggerConfig, glob_matches};
pub use types::{PipelineResult, RunState, Validate};
