//! Error types for pipeline domain

use thiserror::Error;

/// Errors that can occur during a pipeline run
///
/// An unreachable build cache deliberately has no variant here: it is
/// recovered inside the build executor and never surfaces as a run failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Configuration is invalid and must be fixed by the operator
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationError),

    /// Tag resolution produced zero tags for a matched event
    #[error("No tags resolved for event '{event}': refusing to publish an untagged image")]
    NoTagsResolved {
        /// Display form of the offending event.
        event: String,
    },

    /// Image build failed
    #[error("Build failed for target '{target}': {reason}")]
    Build {
        /// Build stage that was being built.
        target: String,
        /// Error output from the build engine.
        reason: String,
    },

    /// Registry authentication failed
    #[error("Authentication to registry '{registry}' failed: {reason}")]
    Auth {
        /// Registry host that rejected the credentials.
        registry: String,
        /// Error output from the login attempt.
        reason: String,
    },

    /// Pushing a single tag failed
    #[error("Push failed for tag '{tag}': {reason}")]
    Push {
        /// Tag whose push failed.
        tag: String,
        /// Error output from the push attempt.
        reason: String,
    },

    /// Container engine is unavailable or misbehaving
    #[error("Engine error: {0}")]
    Engine(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl PipelineError {
    /// Returns true if the error means the run's configuration is at fault
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::NoTagsResolved { .. })
    }
}

/// Validation errors for pipeline configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Image name cannot be empty
    #[error("Image name cannot be empty")]
    EmptyImageName,

    /// Registry host cannot be empty
    #[error("Registry host cannot be empty")]
    EmptyRegistry,

    /// At least one tag rule must be configured
    #[error("Pipeline must declare at least one tag rule")]
    NoTagRules,

    /// Trigger configuration accepts no events
    #[error("Trigger configuration accepts no event kinds")]
    NoTriggers,

    /// Glob pattern is empty or malformed
    #[error("Invalid trigger pattern: '{pattern}'")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
    },

    /// Build context path is empty
    #[error("Build context cannot be empty")]
    EmptyBuildContext,

    /// Cache export declared without a destination ref
    #[error("Cache export ref cannot be empty")]
    EmptyCacheRef,

    /// Credentials are incomplete
    #[error("Missing credential field: {field}")]
    MissingCredential {
        /// Name of the missing field.
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        let err = PipelineError::NoTagsResolved {
            event: "tag:v0".to_string(),
        };
        assert!(err.is_configuration());

        let err = PipelineError::Configuration(ValidationError::NoTagRules);
        assert!(err.is_configuration());

        let err = PipelineError::Build {
            target: "runtime".to_string(),
            reason: "boom".to_string(),
        };
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = PipelineError::Push {
            tag: "1.2.3".to_string(),
            reason: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "Push failed for tag '1.2.3': denied");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PipelineError = io.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
