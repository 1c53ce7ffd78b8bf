//! conform CLI: repository convention checks.
//!
//! Runs the built-in rules against a repository, prints parsed workflow
//! documents, and lists the configured ignore rules. See `conform --help`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod commands;
mod rules;

use cli_args::{Cli, Commands};

/// Variable holding the log filter directive, e.g. `CONFORM_LOG=conform_enforce=debug`.
const LOG_ENV: &str = "CONFORM_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = commands::resolve_config(cli.root.as_deref(), cli.config.as_deref());

    let exit_code = match cli.command {
        Commands::Check { rules } => commands::check::run(config, rules, cli.json),
        Commands::Workflow { file } => commands::workflow::run(&config, &file),
        Commands::Ignore => commands::ignore::run(&config, cli.json),
        Commands::Rules => commands::list_rules(cli.json),
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
