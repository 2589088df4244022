//! # clyde-cli
//!
//! Command line interface for the Clyde C/C++ package manager.
//!
//! This is the main entry point for the `clyde` tool. It handles command parsing,
//! sets up logging and error reporting, and dispatches to the command handlers.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Dependency graph tooling for C/C++ packages
#[derive(Parser)]
#[command(name = "clyde", version, about = "C/C++ package manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the dependency-first build order
    Order {
        /// Package directory (defaults to the current directory)
        path: Option<Utf8PathBuf>,
    },
    /// Report circular dependencies
    Cycles {
        /// Package directory (defaults to the current directory)
        path: Option<Utf8PathBuf>,
    },
    /// Export the dependency graph
    Graph {
        /// Package directory (defaults to the current directory)
        path: Option<Utf8PathBuf>,
        #[arg(long, value_enum, default_value_t = GraphFormat::Json)]
        format: GraphFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
    /// Select versions matching a range
    Select {
        /// Version range, e.g. ">=1.2.0 <2.0.0"
        range: String,
        /// Candidate versions
        #[arg(required = true)]
        versions: Vec<String>,
        /// Print every match, lowest first
        #[arg(long, conflicts_with = "earliest")]
        all: bool,
        /// Pick the lowest match instead of the highest
        #[arg(long)]
        earliest: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Json,
    Dot,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting Clyde CLI v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&err));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<commands::CommandStatus> {
    let ctx = CommandContext::new()?;
    commands::dispatch_command(cli.command, &ctx)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clyde={level},clyde_core={level},clyde_config={level},clyde_resolver={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Clyde encountered an unexpected error: {}", panic_info);
        eprintln!("Clyde crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/clyde-pm/clyde/issues");
        eprintln!("Error: {}", panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_graph_command() {
        let cli = Cli::try_parse_from(["clyde", "-v", "graph", "pkg", "--format", "dot", "-o", "out.dot"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Graph { path, format, output } => {
                assert_eq!(path, Some(Utf8PathBuf::from("pkg")));
                assert_eq!(format, GraphFormat::Dot);
                assert_eq!(output, Some(Utf8PathBuf::from("out.dot")));
            },
            _ => panic!("expected graph command"),
        }
    }

    #[test]
    fn test_select_flags_conflict() {
        assert!(Cli::try_parse_from(["clyde", "select", "^1.0.0", "1.0.0", "--all", "--earliest"]).is_err());
        assert!(Cli::try_parse_from(["clyde", "select", "^1.0.0"]).is_err());
    }
}
