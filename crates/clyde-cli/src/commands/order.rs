//! `clyde order`: dependency-first build order

use anyhow::Context;
use camino::Utf8Path;

use clyde_resolver::DependencyResolver;

use super::{resolve_project, CommandContext, CommandStatus};

pub fn execute(path: Option<&Utf8Path>, ctx: &CommandContext) -> anyhow::Result<CommandStatus> {
    let resolver = resolve_project(path, ctx)?;

    for line in render(&resolver)? {
        ctx.output.print(&line);
    }

    Ok(CommandStatus::Success)
}

/// One `name version` line per package, dependencies first
pub fn render(resolver: &DependencyResolver) -> anyhow::Result<Vec<String>> {
    let order = resolver
        .build_order()
        .context("Failed to compute build order")?;

    Ok(order
        .iter()
        .map(|package| format!("{} {}", package.name(), package.version()))
        .collect())
}
