//! Tag rules and metadata resolution
//!
//! Tags are derived from the triggering event by an ordered list of small
//! pure rules. Each rule either yields one tag or nothing; a rule that does
//! not apply to the event is silently skipped. Labels are fixed OCI metadata
//! derived from the image identity, never user-configurable per run.

use super::errors::PipelineError;
use super::event::EventDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OCI label key for the image title
pub const LABEL_TITLE: &str = "org.opencontainers.image.title";
/// OCI label key for the source revision
pub const LABEL_REVISION: &str = "org.opencontainers.image.revision";
/// OCI label key for the source repository URL
pub const LABEL_SOURCE: &str = "org.opencontainers.image.source";

static SEMVER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)$").unwrap()
});

/// A single tag-derivation rule
///
/// Rules are evaluated in declaration order; each applies to the event
/// independently via [`TagRule::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagRule {
    /// Emit `X.Y.Z[-pre]` when the ref is a `vX.Y.Z[-pre]` tag
    Semver,
    /// Emit the sanitized branch, tag, or PR identifier
    Ref,
    /// Emit `sha-<full commit hash>`
    Sha,
}

impl TagRule {
    /// Applies this rule to an event
    ///
    /// Returns `None` when the rule does not apply; that is never an error.
    #[must_use]
    pub fn apply(&self, event: &EventDescriptor) -> Option<String> {
        match self {
            Self::Semver => {
                if !event.is_tag() {
                    return None;
                }
                SEMVER_TAG
                    .captures(&event.ref_name)
                    .map(|caps| caps[1].to_string())
            }
            Self::Ref => {
                if event.ref_name.is_empty() {
                    return None;
                }
                Some(sanitize_ref(&event.ref_name))
            }
            Self::Sha => {
                if event.sha.is_empty() {
                    return None;
                }
                Some(format!("sha-{}", event.sha))
            }
        }
    }
}

/// Sanitizes a ref into a valid image tag
///
/// Characters outside `[A-Za-z0-9._-]` become `-` (a branch like
/// `feature/login` tags as `feature-login`).
fn sanitize_ref(ref_name: &str) -> String {
    ref_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Tags and labels resolved for one run
///
/// Derived, recomputed each run, never persisted. Tags keep insertion order
/// with duplicates removed; labels are a deterministic map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// Image tags in resolution order, deduplicated
    pub tags: Vec<String>,

    /// OCI labels to attach to the image
    pub labels: BTreeMap<String, String>,
}

impl ResolvedMetadata {
    /// Fully qualified references (`registry/image:tag`) for every tag
    #[must_use]
    pub fn qualified_refs(&self, repository: &str) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| format!("{repository}:{tag}"))
            .collect()
    }
}

/// Static identity an image is labelled with
///
/// Owned by the pipeline configuration; the same values go into every run's
/// labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIdentity {
    /// Short image name (label `org.opencontainers.image.title`)
    pub name: String,

    /// Source repository URL (label `org.opencontainers.image.source`)
    pub source_url: String,
}

/// Resolves tags and labels for an event
///
/// Rules run in declaration order; outputs are deduplicated by string
/// equality keeping the first occurrence. Resolution is deterministic and
/// idempotent for a given event.
///
/// # Errors
///
/// Returns [`PipelineError::NoTagsResolved`] when every rule skips: the
/// engine refuses to publish an untagged image, and the caller must treat
/// this as a fatal configuration error.
pub fn resolve(
    event: &EventDescriptor,
    rules: &[TagRule],
    identity: &ImageIdentity,
) -> Result<ResolvedMetadata, PipelineError> {
    let mut tags: Vec<String> = Vec::with_capacity(rules.len());

    for rule in rules {
        if let Some(tag) = rule.apply(event) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    if tags.is_empty() {
        return Err(PipelineError::NoTagsResolved {
            event: event.to_string(),
        });
    }

    let mut labels = BTreeMap::new();
    labels.insert(LABEL_TITLE.to_string(), identity.name.clone());
    labels.insert(LABEL_REVISION.to_string(), event.sha.clone());
    labels.insert(LABEL_SOURCE.to_string(), identity.source_url.clone());

    Ok(ResolvedMetadata { tags, labels })
}
