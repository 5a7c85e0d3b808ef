//! CI environment binding
//!
//! Builds an [`EventDescriptor`] from the conventional CI variables
//! `PIPELINE_EVENT`, `PIPELINE_REF`, and `PIPELINE_SHA`. This is the only
//! place where event data crosses from the process environment into the
//! engine; every component downstream receives the descriptor explicitly.

use crate::pipeline::{EventDescriptor, EventKind};
use anyhow::{Context, bail};

/// Environment variable naming the event kind (`push`, `tag`, `pull_request`)
pub const EVENT_VAR: &str = "PIPELINE_EVENT";
/// Environment variable holding the triggering ref
pub const REF_VAR: &str = "PIPELINE_REF";
/// Environment variable holding the full commit hash
pub const SHA_VAR: &str = "PIPELINE_SHA";

/// Reads the triggering event from the process environment
///
/// # Errors
///
/// Fails when a variable is missing or the event kind is unknown.
pub fn event_from_env() -> anyhow::Result<EventDescriptor> {
    from_lookup(|name| std::env::var(name).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<EventDescriptor> {
    let kind_raw = lookup(EVENT_VAR).with_context(|| format!("{EVENT_VAR} is not set"))?;
    let ref_name = lookup(REF_VAR).with_context(|| format!("{REF_VAR} is not set"))?;
    let sha = lookup(SHA_VAR).with_context(|| format!("{SHA_VAR} is not set"))?;

    let kind = match kind_raw.as_str() {
        "push" => EventKind::Push,
        "tag" => EventKind::Tag,
        "pull_request" => EventKind::PullRequest,
        other => bail!("unknown event kind '{other}' in {EVENT_VAR}"),
    };

    Ok(EventDescriptor::new(kind, ref_name, sha))
}
