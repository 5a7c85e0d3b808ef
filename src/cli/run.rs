//! `shipwright run` - Execute a pipeline run

use crate::executor::{
    DockerBuildExecutor, DockerPublisher, NoopBuilder, NoopPublisher, Orchestrator, RunContext,
    RunReport,
};
use crate::infrastructure::{PipelineConfig, event_from_env};
use crate::pipeline::{Credentials, EventDescriptor, EventKind};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Environment variable holding the registry user name
pub const USERNAME_VAR: &str = "REGISTRY_USERNAME";
/// Environment variable holding the registry token
pub const PASSWORD_VAR: &str = "REGISTRY_PASSWORD";

/// Options collected from the `run` subcommand
#[derive(Debug)]
pub struct RunOptions {
    /// Pipeline configuration file
    pub config: PathBuf,
    /// Event kind, unless read from the environment
    pub event: Option<EventKind>,
    /// Triggering ref, unless read from the environment
    pub ref_name: Option<String>,
    /// Commit hash, unless read from the environment
    pub sha: Option<String>,
    /// Read the event from the CI environment instead
    pub from_env: bool,
    /// Directory the build context is resolved against
    pub working_dir: PathBuf,
    /// Use the no-op builder and publisher
    pub dry_run: bool,
}

/// Executes a run and maps its terminal state to the process outcome
///
/// `Skipped` is a success with zero side effects; only `Failed` becomes an
/// error (and therefore a non-zero exit status).
pub fn run_pipeline(options: &RunOptions) -> Result<RunReport> {
    let config = PipelineConfig::load(&options.config)?;
    let event = resolve_event(options)?;

    // Dry runs touch no registry, so placeholder credentials are enough.
    let credentials = if options.dry_run {
        credentials_from_env(&config).unwrap_or_else(|_| {
            Credentials::new(registry_host(&config.registry), "dry-run", "dry-run")
        })
    } else {
        credentials_from_env(&config)?
    };
    let context = RunContext::new(options.working_dir.clone(), credentials);

    let report = if options.dry_run {
        Orchestrator::new(config, NoopBuilder, NoopPublisher, context).run(&event)
    } else {
        let builder = DockerBuildExecutor::new();
        let health = crate::executor::ImageBuilder::health_check(&builder);
        if !health.is_operational() {
            bail!("build engine is not operational: {health:?}");
        }
        Orchestrator::new(config, builder, DockerPublisher::new(), context).run(&event)
    };

    if let crate::pipeline::RunState::Failed { ref error } = report.state {
        bail!("run {} failed: {error}", report.run_id);
    }
    Ok(report)
}

fn resolve_event(options: &RunOptions) -> Result<EventDescriptor> {
    if options.from_env {
        return event_from_env();
    }

    match (&options.event, &options.ref_name, &options.sha) {
        (Some(kind), Some(ref_name), Some(sha)) => {
            Ok(EventDescriptor::new(*kind, ref_name.clone(), sha.clone()))
        }
        _ => bail!("provide --event, --ref and --sha, or use --from-env"),
    }
}

/// Builds run credentials from the environment
///
/// The registry host is the first path segment of the configured registry;
/// the username and token come from `REGISTRY_USERNAME` / `REGISTRY_PASSWORD`.
fn credentials_from_env(config: &PipelineConfig) -> Result<Credentials> {
    let host = registry_host(&config.registry);
    let username =
        std::env::var(USERNAME_VAR).with_context(|| format!("{USERNAME_VAR} is not set"))?;
    let secret =
        std::env::var(PASSWORD_VAR).with_context(|| format!("{PASSWORD_VAR} is not set"))?;
    Ok(Credentials::new(host, username, secret))
}

fn registry_host(registry: &str) -> &str {
    registry.split('/').next().unwrap_or(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_host_strips_owner_path() {
        assert_eq!(registry_host("ghcr.io/acme"), "ghcr.io");
        assert_eq!(registry_host("registry.example.com"), "registry.example.com");
    }

    #[test]
    fn test_resolve_event_from_flags() {
        let options = RunOptions {
            config: PathBuf::from("shipwright.yml"),
            event: Some(EventKind::Tag),
            ref_name: Some("v1.2.3".to_string()),
            sha: Some("abc".to_string()),
            from_env: false,
            working_dir: PathBuf::from("."),
            dry_run: true,
        };
        let event = resolve_event(&options).unwrap();
        assert_eq!(event, EventDescriptor::tag("v1.2.3", "abc"));
    }

    #[test]
    fn test_resolve_event_requires_all_flags() {
        let options = RunOptions {
            config: PathBuf::from("shipwright.yml"),
            event: Some(EventKind::Push),
            ref_name: None,
            sha: None,
            from_env: false,
            working_dir: PathBuf::from("."),
            dry_run: true,
        };
        assert!(resolve_event(&options).is_err());
    }
}
