//! `shipwright check` - Validate a pipeline configuration

use crate::infrastructure::PipelineConfig;
use anyhow::Result;
use std::path::Path;

/// Loads and validates a configuration file, reporting what it declares
///
/// # Errors
///
/// Fails when the file is unreadable, unparsable, or invalid.
pub fn check_config(path: &Path) -> Result<PipelineConfig> {
    let config = PipelineConfig::load(path)?;

    println!("{} is valid", path.display());
    println!("  repository: {}", config.repository());
    println!(
        "  triggers: {} branch, {} tag, {} pull-request pattern(s)",
        config.triggers.branches.len(),
        config.triggers.tags.len(),
        config.triggers.pull_requests.len()
    );
    println!("  tag rules: {}", config.tag_rules.len());
    if let Some(ref cache) = config.build.cache_from {
        println!("  cache from: {cache}");
    }
    if let Some(ref export) = config.build.cache_to {
        println!("  cache to: {} (mode {})", export.cache_ref, export.mode);
    }

    Ok(config)
}
