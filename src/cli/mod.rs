//! CLI for shipwright
//!
//! - `run`: execute a pipeline run for a triggering event
//! - `check`: validate a pipeline configuration without running it
//! - `completions`: generate shell completions

pub mod check;
pub mod completions;
pub mod run;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for shipwright
#[derive(Parser, Debug)]
#[command(name = "shipwright")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a pipeline run for a triggering event
    Run {
        /// Pipeline configuration file
        #[arg(short, long, default_value = "shipwright.yml")]
        config: PathBuf,

        /// Event kind (ignored with --from-env)
        #[arg(long, value_enum)]
        event: Option<EventKindArg>,

        /// Triggering ref: branch, tag, or PR identifier
        #[arg(long = "ref")]
        ref_name: Option<String>,

        /// Full commit hash
        #[arg(long)]
        sha: Option<String>,

        /// Read the event from PIPELINE_EVENT / PIPELINE_REF / PIPELINE_SHA
        #[arg(long, conflicts_with_all = ["event", "ref_name", "sha"])]
        from_env: bool,

        /// Directory the build context is resolved against
        #[arg(short, long, default_value = ".")]
        working_dir: PathBuf,

        /// Walk the state machine without building or pushing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a pipeline configuration
    Check {
        /// Pipeline configuration file
        #[arg(default_value = "shipwright.yml")]
        config: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EventKindArg {
    Push,
    Tag,
    PullRequest,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            event,
            ref_name,
            sha,
            from_env,
            working_dir,
            dry_run,
        } => {
            let options = run::RunOptions {
                config,
                event: event.map(|kind| match kind {
                    EventKindArg::Push => crate::pipeline::EventKind::Push,
                    EventKindArg::Tag => crate::pipeline::EventKind::Tag,
                    EventKindArg::PullRequest => crate::pipeline::EventKind::PullRequest,
                }),
                ref_name,
                sha,
                from_env,
                working_dir,
                dry_run,
            };
            run::run_pipeline(&options)?;
        }
        Command::Check { config } => {
            check::check_config(&config)?;
        }
        Command::Completions { shell } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let output = completions::generate_completions(shell_enum)?;
            println!("{}", output);
        }
    }

    Ok(())
}

/// Build the CLI command for completion generation
#[must_use]
pub fn build_cli() -> clap::Command {
    use clap::CommandFactory;
    Args::command()
}
