//! Trigger configuration and event matching
//!
//! A [`TriggerConfig`] is the static, declarative description of which
//! repository events start a run. Matching is pure: it never errors and has
//! no side effects; an event that does not match simply short-circuits the
//! orchestrator into a skipped run.

use super::errors::ValidationError;
use super::event::{EventDescriptor, EventKind};
use super::types::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declarative trigger configuration
///
/// Each accepted event kind carries its own list of ref globs. Kinds with an
/// empty pattern list accept no events of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TriggerConfig {
    /// Branch-name globs accepted for push events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    /// Tag-name globs accepted for tag-push events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Target-branch globs accepted for pull-request events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull_requests: Vec<String>,
}

impl TriggerConfig {
    /// Creates an empty trigger configuration accepting nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds branch globs for push events
    #[must_use]
    pub fn with_branches(mut self, patterns: Vec<String>) -> Self {
        self.branches = patterns;
        self
    }

    /// Adds tag globs for tag-push events
    #[must_use]
    pub fn with_tags(mut self, patterns: Vec<String>) -> Self {
        self.tags = patterns;
        self
    }

    /// Adds target-branch globs for pull-request events
    #[must_use]
    pub fn with_pull_requests(mut self, patterns: Vec<String>) -> Self {
        self.pull_requests = patterns;
        self
    }

    /// Returns the glob list for an event kind
    fn patterns_for(&self, kind: EventKind) -> &[String] {
        match kind {
            EventKind::Push => &self.branches,
            EventKind::Tag => &self.tags,
            EventKind::PullRequest => &self.pull_requests,
        }
    }

    /// Decides whether an event triggers this pipeline
    ///
    /// Returns true iff the event kind has at least one configured glob and
    /// the event ref matches one of them. Never errors.
    #[must_use]
    pub fn matches(&self, event: &EventDescriptor) -> bool {
        self.patterns_for(event.kind)
            .iter()
            .any(|pattern| glob_matches(pattern, &event.ref_name))
    }
}

impl Validate for TriggerConfig {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.branches.is_empty() && self.tags.is_empty() && self.pull_requests.is_empty() {
            return Err(ValidationError::NoTriggers);
        }

        for pattern in self
            .branches
            .iter()
            .chain(&self.tags)
            .chain(&self.pull_requests)
        {
            if pattern.is_empty() {
                return Err(ValidationError::InvalidPattern {
                    pattern: pattern.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Matches a ref against a shell-style glob
///
/// Case-sensitive; `*` matches any run of characters except `/`, so a glob
/// never crosses a path boundary. The whole ref must match.
#[must_use]
pub fn glob_matches(pattern: &str, ref_name: &str) -> bool {
    glob_to_regex(pattern).is_match(ref_name)
}

/// Translates a glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Regex {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str("[^/]*"),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');

    // Every metacharacter is escaped above, so this can only fail on regex
    // size limits no realistic glob reaches.
    Regex::new(&source).unwrap_or_else(|_| Regex::new("^$").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canonical() -> TriggerConfig {
        TriggerConfig::new()
            .with_branches(vec!["main".to_string(), "deploy-*".to_string()])
            .with_tags(vec!["v*.*.*".to_string()])
    }

    #[test]
    fn test_exact_branch_match() {
        let config = canonical();
        assert!(config.matches(&EventDescriptor::push("main", "sha")));
        assert!(!config.matches(&EventDescriptor::push("develop", "sha")));
    }

    #[test]
    fn test_branch_glob_match() {
        let config = canonical();
        assert!(config.matches(&EventDescriptor::push("deploy-staging", "sha")));
        assert!(config.matches(&EventDescriptor::push("deploy-", "sha")));
        assert!(!config.matches(&EventDescriptor::push("redeploy-staging", "sha")));
    }

    #[test]
    fn test_tag_glob_match() {
        let config = canonical();
        assert!(config.matches(&EventDescriptor::tag("v1.2.3", "sha")));
        assert!(config.matches(&EventDescriptor::tag("v10.0.1", "sha")));
        assert!(!config.matches(&EventDescriptor::tag("1.2.3", "sha")));
        assert!(!config.matches(&EventDescriptor::tag("release-1", "sha")));
    }

    #[test]
    fn test_kind_gates_pattern_set() {
        // "main" is a branch glob, so a tag named "main" must not match.
        let config = canonical();
        assert!(!config.matches(&EventDescriptor::tag("main", "sha")));
        assert!(!config.matches(&EventDescriptor::push("v1.2.3", "sha")));
    }

    #[test]
    fn test_unconfigured_kind_matches_nothing() {
        let config = canonical();
        assert!(!config.matches(&EventDescriptor::pull_request("main", "sha")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let config = canonical();
        assert!(!config.matches(&EventDescriptor::push("Main", "sha")));
    }

    #[test]
    fn test_glob_does_not_cross_slash() {
        assert!(glob_matches("deploy-*", "deploy-eu-west"));
        assert!(!glob_matches("deploy-*", "deploy-eu/west"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        assert!(glob_matches("v*.*.*", "v1.2.3"));
        assert!(!glob_matches("v*.*.*", "v1x2x3"));
        assert!(glob_matches("a+b", "a+b"));
        assert!(!glob_matches("a+b", "aab"));
    }

    #[test]
    fn test_validate_rejects_empty_config() {
        let config = TriggerConfig::new();
        assert_eq!(config.validate(), Err(ValidationError::NoTriggers));
    }

    #[test]
    fn test_validate_rejects_empty_pattern() {
        let config = TriggerConfig::new().with_branches(vec![String::new()]);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_canonical_config_is_valid() {
        assert!(canonical().validate().is_ok());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // A glob without metacharacters only matches itself.
            #[test]
            fn literal_globs_match_exactly(ref_name in "[A-Za-z0-9._-]{1,30}") {
                prop_assert!(glob_matches(&ref_name, &ref_name));
                let extended = format!("{ref_name}x");
                prop_assert!(!glob_matches(&ref_name, &extended));
            }

            // A trailing star accepts any slash-free suffix.
            #[test]
            fn star_accepts_any_suffix(suffix in "[A-Za-z0-9._-]{0,20}") {
                let candidate = format!("deploy-{suffix}");
                prop_assert!(glob_matches("deploy-*", &candidate));
            }

            // Matching never panics on arbitrary input.
            #[test]
            fn matching_is_total(pattern in "\\PC{0,20}", ref_name in "\\PC{0,40}") {
                let _ = glob_matches(&pattern, &ref_name);
            }
        }
    }
}
