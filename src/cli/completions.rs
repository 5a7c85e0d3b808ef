//! `shipwright completions` - Generate shell completions

use anyhow::{Context, Result};
use clap_complete::Shell;

/// Generates completion script text for a shell
///
/// # Errors
///
/// Fails only if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String> {
    use clap_complete::generate;

    let mut cmd = super::build_cli();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "shipwright", &mut buf);

    String::from_utf8(buf).context("Failed to generate completions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_bash_completions() {
        let completions = generate_completions(Shell::Bash).unwrap();
        assert!(!completions.is_empty());
        assert!(completions.contains("shipwright"));
    }

    #[test]
    fn test_generate_zsh_completions() {
        let completions = generate_completions(Shell::Zsh).unwrap();
        assert!(completions.contains("shipwright"));
    }
}
