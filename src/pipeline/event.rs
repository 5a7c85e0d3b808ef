//! Triggering events
//!
//! An [`EventDescriptor`] is the immutable record of the repository event
//! that started a run. Components receive it by reference; nothing in the
//! engine reads event data from the process environment directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of repository event that can trigger a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A branch push
    Push,
    /// A tag push
    Tag,
    /// A pull request update
    PullRequest,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Tag => write!(f, "tag"),
            Self::PullRequest => write!(f, "pull_request"),
        }
    }
}

/// Descriptor of a single triggering event
///
/// Created once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Event kind
    pub kind: EventKind,

    /// Ref that triggered the event: branch name, tag name, or PR identifier
    pub ref_name: String,

    /// Full commit hash the event points at
    pub sha: String,
}

impl EventDescriptor {
    /// Creates a new event descriptor
    pub fn new(kind: EventKind, ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            kind,
            ref_name: ref_name.into(),
            sha: sha.into(),
        }
    }

    /// Creates a branch-push event
    pub fn push(ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self::new(EventKind::Push, ref_name, sha)
    }

    /// Creates a tag-push event
    pub fn tag(ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self::new(EventKind::Tag, ref_name, sha)
    }

    /// Creates a pull-request event
    pub fn pull_request(ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self::new(EventKind::PullRequest, ref_name, sha)
    }

    /// Returns true if this is a tag-push event
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.kind == EventKind::Tag
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.kind, self.ref_name, self.sha)
    }
}
