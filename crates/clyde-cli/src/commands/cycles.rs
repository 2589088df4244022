//! `clyde cycles`: report circular dependencies

use camino::Utf8Path;

use clyde_resolver::graph::format_cycle;
use clyde_resolver::DependencyResolver;

use super::{resolve_project, CommandContext, CommandStatus};

pub fn execute(path: Option<&Utf8Path>, ctx: &CommandContext) -> anyhow::Result<CommandStatus> {
    let resolver = resolve_project(path, ctx)?;
    let cycles = render(&resolver);

    if cycles.is_empty() {
        ctx.output.success(&format!("No circular dependencies among {} packages", resolver.len()));
        return Ok(CommandStatus::Success);
    }

    for cycle in &cycles {
        ctx.output.error(cycle);
    }
    Ok(CommandStatus::IssuesFound)
}

/// Every cycle rendered as `a -> b -> a`
pub fn render(resolver: &DependencyResolver) -> Vec<String> {
    resolver
        .detect_cycles()
        .iter()
        .map(|cycle| format_cycle(cycle))
        .collect()
}
