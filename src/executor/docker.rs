//! Docker build executor and publisher
//!
//! Drives the container engine through the `docker` CLI: `buildx build` for
//! the cache-aware build, `login`/`tag`/`push` for publishing. One engine
//! instance per run; initialization is idempotent.

use crate::executor::traits::{HealthStatus, ImageBuilder, ImageHandle, PublishResult, Publisher};
use crate::pipeline::{BuildSpec, Credentials, PipelineError, ResolvedMetadata, tags};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Builder that shells out to `docker buildx`
#[derive(Debug, Clone)]
pub struct DockerBuildExecutor {
    /// Engine binary to invoke
    engine: String,
}

impl DockerBuildExecutor {
    /// Creates a new executor driving the `docker` binary
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: "docker".to_string(),
        }
    }

    /// Overrides the engine binary (e.g. `podman`)
    #[must_use]
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Checks if the engine binary responds at all
    fn is_engine_available(&self) -> bool {
        Command::new(&self.engine)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Probes whether the cache source ref is reachable
    ///
    /// The cache is an optimization only; a failed probe downgrades the
    /// build to uncached instead of failing it.
    fn cache_reachable(&self, cache_ref: &str) -> bool {
        Command::new(&self.engine)
            .args(["buildx", "imagetools", "inspect", cache_ref])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Reads the engine-local image id for the built ref
    fn inspect_digest(&self, local_ref: &str) -> Option<String> {
        let output = Command::new(&self.engine)
            .args(["image", "inspect", "--format", "{{.Id}}", local_ref])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!id.is_empty()).then_some(id)
    }
}

impl Default for DockerBuildExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the `buildx build` argument list
///
/// Split out of [`DockerBuildExecutor::build`] so the flag layout is
/// testable without an engine. `use_cache_from` reflects the outcome of the
/// reachability probe.
fn build_args(
    spec: &BuildSpec,
    metadata: &ResolvedMetadata,
    local_ref: &str,
    use_cache_from: bool,
) -> Vec<String> {
    let mut args = vec![
        "buildx".to_string(),
        "build".to_string(),
        "--load".to_string(),
        "--tag".to_string(),
        local_ref.to_string(),
    ];

    if let Some(ref target) = spec.target {
        args.push("--target".to_string());
        args.push(target.clone());
    }

    if use_cache_from {
        if let Some(ref cache_from) = spec.cache_from {
            args.push("--cache-from".to_string());
            args.push(format!("type=registry,ref={cache_from}"));
        }
    }

    if let Some(ref export) = spec.cache_to {
        args.push("--cache-to".to_string());
        args.push(format!(
            "type=registry,ref={},mode={}",
            export.cache_ref, export.mode
        ));
    }

    for (key, value) in &metadata.labels {
        args.push("--label".to_string());
        args.push(format!("{key}={value}"));
    }

    args.push(spec.context.to_string_lossy().into_owned());
    args
}

impl ImageBuilder for DockerBuildExecutor {
    fn build(
        &self,
        spec: &BuildSpec,
        metadata: &ResolvedMetadata,
        working_dir: &Path,
    ) -> Result<ImageHandle, PipelineError> {
        let revision = metadata
            .labels
            .get(tags::LABEL_REVISION)
            .map_or("latest", |sha| &sha[..sha.len().min(12)]);
        let local_ref = format!("shipwright-build:{revision}");

        let use_cache_from = match spec.cache_from {
            Some(ref cache_ref) => {
                let reachable = self.cache_reachable(cache_ref);
                if !reachable {
                    tracing::warn!(
                        cache_from = %cache_ref,
                        "Cache source unreachable, building without cache"
                    );
                }
                reachable
            }
            None => false,
        };

        let args = build_args(spec, metadata, &local_ref, use_cache_from);
        tracing::info!(
            target = %spec.target_name(),
            local_ref = %local_ref,
            cached = use_cache_from,
            "Starting image build"
        );

        let output = Command::new(&self.engine)
            .args(&args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| PipelineError::Engine(e.to_string()))?;

        if !output.status.success() {
            return Err(PipelineError::Build {
                target: spec.target_name().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let mut handle = ImageHandle::new(local_ref);
        if let Some(digest) = self.inspect_digest(&handle.local_ref) {
            handle = handle.with_digest(digest);
        }

        tracing::info!(
            local_ref = %handle.local_ref,
            digest = handle.digest.as_deref().unwrap_or("unknown"),
            "Image build finished"
        );
        Ok(handle)
    }

    fn health_check(&self) -> HealthStatus {
        if !self.is_engine_available() {
            return HealthStatus::Unhealthy {
                reason: format!("{} is not available", self.engine),
            };
        }

        let buildx = Command::new(&self.engine)
            .args(["buildx", "version"])
            .output();

        match buildx {
            Ok(o) if o.status.success() => HealthStatus::Healthy,
            Ok(_) => HealthStatus::Degraded {
                reason: "buildx plugin is not installed".to_string(),
            },
            Err(e) => HealthStatus::Unhealthy {
                reason: format!("Engine error: {e}"),
            },
        }
    }
}

/// Publisher that shells out to `docker login` / `tag` / `push`
#[derive(Debug, Clone)]
pub struct DockerPublisher {
    engine: String,
}

impl Default for DockerPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerPublisher {
    /// Creates a new publisher driving the `docker` binary
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: "docker".to_string(),
        }
    }

    fn run_checked(&self, args: &[&str]) -> Result<(), String> {
        let output = Command::new(&self.engine)
            .args(args)
            .output()
            .map_err(|e| e.to_string())?;
        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }
}

impl Publisher for DockerPublisher {
    fn login(&self, credentials: &Credentials) -> Result<(), PipelineError> {
        tracing::info!(
            registry = %credentials.registry,
            username = %credentials.username,
            "Authenticating to registry"
        );

        let mut child = Command::new(&self.engine)
            .args([
                "login",
                &credentials.registry,
                "--username",
                &credentials.username,
                "--password-stdin",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PipelineError::Auth {
                registry: credentials.registry.clone(),
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(credentials.secret.expose().as_bytes())
                .map_err(|e| PipelineError::Auth {
                    registry: credentials.registry.clone(),
                    reason: e.to_string(),
                })?;
        }

        let output = child.wait_with_output().map_err(|e| PipelineError::Auth {
            registry: credentials.registry.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(PipelineError::Auth {
                registry: credentials.registry.clone(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }

    fn publish(
        &self,
        image: &ImageHandle,
        metadata: &ResolvedMetadata,
        repository: &str,
    ) -> Result<PublishResult, PipelineError> {
        let mut pushed = Vec::with_capacity(metadata.tags.len());

        // One image, many tag pointers: first failure aborts the rest.
        for (tag, qualified) in metadata
            .tags
            .iter()
            .zip(metadata.qualified_refs(repository))
        {
            self.run_checked(&["tag", &image.local_ref, &qualified])
                .map_err(|reason| PipelineError::Push {
                    tag: tag.clone(),
                    reason,
                })?;

            tracing::info!(tag = %qualified, "Pushing tag");
            self.run_checked(&["push", &qualified])
                .map_err(|reason| PipelineError::Push {
                    tag: tag.clone(),
                    reason,
                })?;

            pushed.push(qualified);
        }

        Ok(PublishResult { pushed })
    }
}
