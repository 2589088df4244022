//! Command implementations and dispatch logic.
//!
//! Each command is a synchronous function taking a [`CommandContext`] and
//! returning whether it found issues, which becomes the process exit status.

use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use clyde_config::ManifestLoader;
use clyde_resolver::DependencyResolver;

pub mod cycles;
pub mod graph;
pub mod order;
pub mod select;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

/// Outcome of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command worked but found something to report, e.g. a cycle
    IssuesFound,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::IssuesFound => ExitCode::from(1),
        }
    }
}

impl CommandContext {
    /// Create a new command context
    pub fn new() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|path| anyhow::anyhow!("Current directory {} is not valid UTF-8", path.display()))?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
        })
    }

    /// Absolute form of a user-supplied path
    pub fn resolve_path(&self, path: Option<&Utf8Path>) -> Utf8PathBuf {
        match path {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.cwd.join(path),
            None => self.cwd.clone(),
        }
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> anyhow::Result<CommandStatus> {
    match command {
        Commands::Order { path } => {
            info!("Computing build order");
            order::execute(path.as_deref(), ctx)
        },
        Commands::Cycles { path } => {
            info!("Checking for circular dependencies");
            cycles::execute(path.as_deref(), ctx)
        },
        Commands::Graph { path, format, output } => {
            info!("Exporting dependency graph ({:?})", format);
            graph::execute(path.as_deref(), format, output.as_deref(), ctx)
        },
        Commands::Select { range, versions, all, earliest } => {
            info!("Selecting from {} candidates for '{}'", versions.len(), range);
            select::execute(&range, &versions, select::Selection::from_flags(all, earliest), ctx)
        },
    }
}

/// Load the project at `path` and walk its dependencies
pub fn resolve_project(path: Option<&Utf8Path>, ctx: &CommandContext) -> anyhow::Result<DependencyResolver> {
    let start = ctx.resolve_path(path);
    let package = ManifestLoader::new(start.clone())
        .load_project()
        .with_context(|| format!("Failed to load project at {}", start))?;

    debug!("Resolving dependencies of {}", package.name());
    let name = package.name().to_string();

    let mut resolver = DependencyResolver::new();
    resolver
        .add_package(package, None)
        .with_context(|| format!("Failed to resolve dependencies of {}", name))?;

    Ok(resolver)
}
