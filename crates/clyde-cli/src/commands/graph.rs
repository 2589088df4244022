//! `clyde graph`: export the dependency graph as JSON or DOT

use anyhow::Context;
use camino::Utf8Path;

use clyde_resolver::DependencyResolver;

use super::{resolve_project, CommandContext, CommandStatus};
use crate::GraphFormat;

pub fn execute(
    path: Option<&Utf8Path>,
    format: GraphFormat,
    output: Option<&Utf8Path>,
    ctx: &CommandContext,
) -> anyhow::Result<CommandStatus> {
    let resolver = resolve_project(path, ctx)?;

    let Some(output) = output else {
        ctx.output.print(&render(&resolver, format)?);
        return Ok(CommandStatus::Success);
    };

    let target = ctx.resolve_path(Some(output));
    match format {
        GraphFormat::Json => {
            resolver
                .write_graph(&target)
                .with_context(|| format!("Failed to write graph to {}", target))?;
        },
        GraphFormat::Dot => {
            std::fs::write(&target, resolver.to_dot())
                .with_context(|| format!("Failed to write graph to {}", target))?;
        },
    }

    ctx.output.success(&format!("Wrote {} packages to {}", resolver.len(), target));
    Ok(CommandStatus::Success)
}

/// Graph in the requested format
pub fn render(resolver: &DependencyResolver, format: GraphFormat) -> anyhow::Result<String> {
    match format {
        GraphFormat::Json => serde_json::to_string_pretty(&resolver.export_graph())
            .context("Failed to serialize dependency graph"),
        GraphFormat::Dot => Ok(resolver.to_dot()),
    }
}
