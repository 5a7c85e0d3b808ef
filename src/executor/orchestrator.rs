//! Pipeline orchestrator
//!
//! Sequences a single run through the state machine
//! `Pending → Matching → Resolving → Building → Publishing` into one of the
//! terminal states. Transitions are strictly sequential and no state is
//! re-entered; the first component error ends the run with no rollback of
//! cache or tags already pushed.

use crate::executor::traits::{ImageBuilder, Publisher, RunContext};
use crate::infrastructure::PipelineConfig;
use crate::pipeline::{EventDescriptor, PipelineError, RunState, Validate};
use std::time::Instant;

/// Report of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Run identifier
    pub run_id: String,

    /// Terminal state the run ended in
    pub state: RunState,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u128,
}

impl RunReport {
    /// Returns true if the run ended without error (including skipped runs)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }
}

/// Drives one pipeline run from event to terminal state
pub struct Orchestrator<B, P> {
    config: PipelineConfig,
    builder: B,
    publisher: P,
    context: RunContext,
}

impl<B: ImageBuilder, P: Publisher> Orchestrator<B, P> {
    /// Creates an orchestrator for a validated configuration
    pub fn new(config: PipelineConfig, builder: B, publisher: P, context: RunContext) -> Self {
        Self {
            config,
            builder,
            publisher,
            context,
        }
    }

    /// Executes a run for the given event
    ///
    /// Never returns `Err` for an unmatched event: that is the `Skipped`
    /// terminal state, a success with zero side effects.
    pub fn run(&self, event: &EventDescriptor) -> RunReport {
        let start = Instant::now();
        let run_id = self.context.run_id.clone();

        tracing::info!(run_id = %run_id, event = %event, "Run starting");
        let state = self.drive(event);
        let duration_ms = start.elapsed().as_millis();

        match &state {
            RunState::Succeeded { tags } => {
                tracing::info!(run_id = %run_id, tags = ?tags, duration_ms, "Run succeeded");
            }
            RunState::Skipped => {
                tracing::info!(run_id = %run_id, duration_ms, "Run skipped: event did not match");
            }
            RunState::Failed { error } => {
                tracing::error!(run_id = %run_id, error = %error, duration_ms, "Run failed");
            }
            other => {
                // drive() only returns terminal states.
                tracing::error!(run_id = %run_id, state = %other, "Run ended in non-terminal state");
            }
        }

        RunReport {
            run_id,
            state,
            duration_ms,
        }
    }

    fn drive(&self, event: &EventDescriptor) -> RunState {
        match self.execute(event) {
            Ok(state) => state,
            Err(error) => RunState::Failed {
                error: error.to_string(),
            },
        }
    }

    fn execute(&self, event: &EventDescriptor) -> Result<RunState, PipelineError> {
        self.config.validate()?;

        tracing::debug!(state = %RunState::Matching, "Transition");
        if !self.config.triggers.matches(event) {
            return Ok(RunState::Skipped);
        }

        tracing::debug!(state = %RunState::Resolving, "Transition");
        let metadata =
            crate::pipeline::resolve(event, &self.config.tag_rules, &self.config.identity())?;
        tracing::info!(tags = ?metadata.tags, "Tags resolved");

        tracing::debug!(state = %RunState::Building, "Transition");
        let image = self
            .builder
            .build(&self.config.build, &metadata, &self.context.working_dir)?;

        tracing::debug!(state = %RunState::Publishing, "Transition");
        self.publisher.login(&self.context.credentials)?;
        let result = self
            .publisher
            .publish(&image, &metadata, &self.config.repository())?;
        tracing::info!(pushed = ?result.pushed, "Publish finished");

        Ok(RunState::Succeeded {
            tags: metadata.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::traits::{HealthStatus, ImageHandle, PublishResult};
    use crate::infrastructure::PipelineConfig;
    use crate::pipeline::{
        BuildSpec, Credentials, ResolvedMetadata, TagRule, TriggerConfig,
    };
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Mutex;

    /// Scripted builder recording whether it ran
    struct FakeBuilder {
        fail: bool,
        calls: Mutex<usize>,
    }

    impl FakeBuilder {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ImageBuilder for FakeBuilder {
        fn build(
            &self,
            spec: &BuildSpec,
            _metadata: &ResolvedMetadata,
            _working_dir: &Path,
        ) -> Result<ImageHandle, PipelineError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(PipelineError::Build {
                    target: spec.target_name().to_string(),
                    reason: "compile error".to_string(),
                });
            }
            Ok(ImageHandle::new("fake:latest").with_digest("sha256:feed"))
        }

        fn health_check(&self) -> HealthStatus {
            HealthStatus::Healthy
        }
    }

    /// Scripted publisher recording logins and pushes
    struct FakePublisher {
        fail_auth: bool,
        fail_tag: Option<String>,
        logins: Mutex<usize>,
        pushed: Mutex<Vec<String>>,
    }

    impl FakePublisher {
        fn ok() -> Self {
            Self {
                fail_auth: false,
                fail_tag: None,
                logins: Mutex::new(0),
                pushed: Mutex::new(Vec::new()),
            }
        }

        fn failing_auth() -> Self {
            Self {
                fail_auth: true,
                ..Self::ok()
            }
        }

        fn failing_on(tag: &str) -> Self {
            Self {
                fail_tag: Some(tag.to_string()),
                ..Self::ok()
            }
        }

        fn pushed(&self) -> Vec<String> {
            self.pushed.lock().unwrap().clone()
        }

        fn logins(&self) -> usize {
            *self.logins.lock().unwrap()
        }
    }

    impl Publisher for FakePublisher {
        fn login(&self, credentials: &Credentials) -> Result<(), PipelineError> {
            *self.logins.lock().unwrap() += 1;
            if self.fail_auth {
                return Err(PipelineError::Auth {
                    registry: credentials.registry.clone(),
                    reason: "bad token".to_string(),
                });
            }
            Ok(())
        }

        fn publish(
            &self,
            _image: &ImageHandle,
            metadata: &ResolvedMetadata,
            repository: &str,
        ) -> Result<PublishResult, PipelineError> {
            let mut pushed = self.pushed.lock().unwrap();
            for (tag, qualified) in metadata
                .tags
                .iter()
                .zip(metadata.qualified_refs(repository))
            {
                if self.fail_tag.as_deref() == Some(tag.as_str()) {
                    return Err(PipelineError::Push {
                        tag: tag.clone(),
                        reason: "denied".to_string(),
                    });
                }
                pushed.push(qualified);
            }
            Ok(PublishResult {
                pushed: pushed.clone(),
            })
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            image: "api".to_string(),
            registry: "ghcr.io/acme".to_string(),
            source_url: "https://example.com/acme/api".to_string(),
            triggers: TriggerConfig::new()
                .with_branches(vec!["main".to_string(), "deploy-*".to_string()])
                .with_tags(vec!["v*.*.*".to_string()]),
            tag_rules: vec![TagRule::Semver, TagRule::Ref, TagRule::Sha],
            build: BuildSpec::default(),
        }
    }

    fn context() -> RunContext {
        RunContext::new(".", Credentials::new("ghcr.io", "octo", "token"))
    }

    fn sha() -> String {
        "abcdef0123456789abcdef0123456789abcdef01".to_string()
    }

    #[test]
    fn test_unmatched_event_skips_with_no_side_effects() {
        let builder = FakeBuilder::ok();
        let publisher = FakePublisher::ok();
        let orchestrator = Orchestrator::new(config(), builder, publisher, context());

        let report = orchestrator.run(&EventDescriptor::push("develop", sha()));

        assert_eq!(report.state, RunState::Skipped);
        assert!(report.is_success());
        assert_eq!(orchestrator.builder.calls(), 0);
        assert_eq!(orchestrator.publisher.logins(), 0);
        assert!(orchestrator.publisher.pushed().is_empty());
    }

    #[test]
    fn test_end_to_end_tag_event() {
        let orchestrator =
            Orchestrator::new(config(), FakeBuilder::ok(), FakePublisher::ok(), context());

        let report = orchestrator.run(&EventDescriptor::tag("v1.2.3", sha()));

        let expected_tags = vec![
            "1.2.3".to_string(),
            "v1.2.3".to_string(),
            format!("sha-{}", sha()),
        ];
        assert_eq!(
            report.state,
            RunState::Succeeded {
                tags: expected_tags.clone()
            }
        );
        assert_eq!(orchestrator.builder.calls(), 1);
        assert_eq!(orchestrator.publisher.logins(), 1);
        assert_eq!(
            orchestrator.publisher.pushed(),
            expected_tags
                .iter()
                .map(|t| format!("ghcr.io/acme/api:{t}"))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_no_tags_resolved_fails_before_build() {
        let mut cfg = config();
        // Semver alone never applies to branch pushes.
        cfg.tag_rules = vec![TagRule::Semver];
        let orchestrator =
            Orchestrator::new(cfg, FakeBuilder::ok(), FakePublisher::ok(), context());

        let report = orchestrator.run(&EventDescriptor::push("main", sha()));

        assert!(report.state.is_failure());
        assert_eq!(orchestrator.builder.calls(), 0);
        assert_eq!(orchestrator.publisher.logins(), 0);
    }

    #[test]
    fn test_build_failure_aborts_before_publish() {
        let orchestrator = Orchestrator::new(
            config(),
            FakeBuilder::failing(),
            FakePublisher::ok(),
            context(),
        );

        let report = orchestrator.run(&EventDescriptor::push("main", sha()));

        assert!(report.state.is_failure());
        assert_eq!(orchestrator.publisher.logins(), 0);
        assert!(orchestrator.publisher.pushed().is_empty());
    }

    #[test]
    fn test_auth_failure_aborts_before_any_push() {
        let orchestrator = Orchestrator::new(
            config(),
            FakeBuilder::ok(),
            FakePublisher::failing_auth(),
            context(),
        );

        let report = orchestrator.run(&EventDescriptor::push("main", sha()));

        assert!(report.state.is_failure());
        assert!(orchestrator.publisher.pushed().is_empty());
    }

    #[test]
    fn test_push_failure_is_fail_fast() {
        // v1.2.3 resolves [1.2.3, v1.2.3, sha-...]; failing on the middle
        // tag must leave only the first pushed.
        let orchestrator = Orchestrator::new(
            config(),
            FakeBuilder::ok(),
            FakePublisher::failing_on("v1.2.3"),
            context(),
        );

        let report = orchestrator.run(&EventDescriptor::tag("v1.2.3", sha()));

        assert!(report.state.is_failure());
        assert_eq!(
            orchestrator.publisher.pushed(),
            vec!["ghcr.io/acme/api:1.2.3".to_string()]
        );
    }

    #[test]
    fn test_invalid_config_fails_the_run() {
        let mut cfg = config();
        cfg.tag_rules.clear();
        let orchestrator =
            Orchestrator::new(cfg, FakeBuilder::ok(), FakePublisher::ok(), context());

        let report = orchestrator.run(&EventDescriptor::push("main", sha()));

        assert!(report.state.is_failure());
        assert_eq!(orchestrator.builder.calls(), 0);
    }

    #[test]
    fn test_deploy_branch_glob_runs() {
        let orchestrator =
            Orchestrator::new(config(), FakeBuilder::ok(), FakePublisher::ok(), context());

        let report = orchestrator.run(&EventDescriptor::push("deploy-staging", sha()));

        assert!(matches!(report.state, RunState::Succeeded { .. }));
    }
}
