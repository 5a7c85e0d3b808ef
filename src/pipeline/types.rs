//! Core types for pipeline domain
//!
//! This module contains the run state machine and the validation trait
//! shared by the configuration types.

#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, super::errors::PipelineError>;

/// States of a single pipeline run
///
/// Transitions are strictly sequential; no state is ever re-entered:
/// `Pending → Matching → Resolving → Building → Publishing` and then one of
/// the three terminal states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Run created, nothing executed yet
    Pending,
    /// Deciding whether the event triggers this pipeline
    Matching,
    /// Deriving tags and labels from the event
    Resolving,
    /// Building the image
    Building,
    /// Pushing the image under its resolved tags
    Publishing,
    /// Terminal: image published under all resolved tags
    Succeeded {
        /// Tags the image was published under, in resolution order.
        tags: Vec<String>,
    },
    /// Terminal: a component failed; no rollback is attempted
    Failed {
        /// Message of the error that ended the run.
        error: String,
    },
    /// Terminal: the event did not match the trigger configuration
    Skipped,
}

impl RunState {
    /// Returns true if this state is terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Failed { .. } | Self::Skipped
        )
    }

    /// Returns true if the run ended without error
    ///
    /// `Skipped` counts as success: the event simply was not for us and the
    /// run had zero side effects.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Skipped)
    }

    /// Returns true if the run failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the run was skipped
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Matching => write!(f, "MATCHING"),
            Self::Resolving => write!(f, "RESOLVING"),
            Self::Building => write!(f, "BUILDING"),
            Self::Publishing => write!(f, "PUBLISHING"),
            Self::Succeeded { .. } => write!(f, "SUCCEEDED"),
            Self::Failed { .. } => write!(f, "FAILED"),
            Self::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Skipped.is_terminal());
        assert!(RunState::Succeeded { tags: vec![] }.is_terminal());
        assert!(
            RunState::Failed {
                error: "x".to_string()
            }
            .is_terminal()
        );
        assert!(!RunState::Building.is_terminal());
        assert!(!RunState::Pending.is_terminal());
    }

    #[test]
    fn test_skipped_counts_as_success() {
        assert!(RunState::Skipped.is_success());
        assert!(RunState::Skipped.is_skipped());
        assert!(!RunState::Skipped.is_failure());
    }

    #[test]
    fn test_failed_is_not_success() {
        let state = RunState::Failed {
            error: "build".to_string(),
        };
        assert!(state.is_failure());
        assert!(!state.is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(RunState::Publishing.to_string(), "PUBLISHING");
        assert_eq!(
            RunState::Succeeded {
                tags: vec!["1.0".to_string()]
            }
            .to_string(),
            "SUCCEEDED"
        );
    }
}
