//! Infrastructure layer
//!
//! This module contains configuration loading and process-level plumbing.

mod config;
mod env;
mod logging;

pub use config::PipelineConfig;
pub use env::event_from_env;
pub use logging::init_logging;
