//! shipwright - CLI for the build-and-publish pipeline engine
//!
//! ## Commands
//!
//! - `shipwright run` - Execute a pipeline run for a triggering event
//! - `shipwright check` - Validate a pipeline configuration
//! - `shipwright completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate the pipeline definition
//! shipwright check shipwright.yml
//!
//! # Execute a run for a tag push
//! REGISTRY_USERNAME=octo REGISTRY_PASSWORD=$TOKEN \
//!   shipwright run --event tag --ref v1.2.3 --sha $(git rev-parse HEAD)
//!
//! # Inside CI, bind the event from the environment
//! shipwright run --from-env
//! ```
//!
//! Exit status is 0 when the run succeeds or is skipped (the event did not
//! match the triggers) and non-zero when it fails.

use std::process::ExitCode;

use shipwright::cli;
use shipwright::infrastructure::init_logging;

fn main() -> ExitCode {
    init_logging("info");

    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if std::env::var("SHIPWRIGHT_VERBOSE").is_ok() {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}
