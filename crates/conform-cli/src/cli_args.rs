use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "conform", version, about = "Repository convention checks")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository root (default: $GITHUB_WORKSPACE, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Ignore-rule file, relative to the root unless absolute
    #[arg(long, global = true, env = "CONFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level (overrides CONFORM_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run built-in rules against the repository
    Check {
        /// Run only this rule (repeatable; default: all)
        #[arg(long = "rule", value_name = "ID")]
        rules: Vec<String>,
    },

    /// Parse a workflow file and print it as JSON
    Workflow {
        /// Path to the workflow YAML file
        file: PathBuf,
    },

    /// List loaded ignore rules grouped by check
    Ignore,

    /// List built-in rules
    Rules,
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
