//! `clyde select`: pick versions matching a range

use anyhow::Context;

use clyde_core::types::{Version, VersionRange};
use clyde_resolver::VersionResolver;

use super::{CommandContext, CommandStatus};

/// Which matches to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Latest,
    Earliest,
    All,
}

impl Selection {
    pub fn from_flags(all: bool, earliest: bool) -> Self {
        match (all, earliest) {
            (true, _) => Selection::All,
            (false, true) => Selection::Earliest,
            (false, false) => Selection::Latest,
        }
    }
}

pub fn execute(
    range: &str,
    versions: &[String],
    selection: Selection,
    ctx: &CommandContext,
) -> anyhow::Result<CommandStatus> {
    let selected = select(range, versions, selection)?;

    if selected.is_empty() {
        ctx.output.warn(&format!("No candidate matches '{}'", range));
        return Ok(CommandStatus::IssuesFound);
    }

    for version in &selected {
        ctx.output.print(&version.to_string());
    }
    Ok(CommandStatus::Success)
}

/// Matching versions, empty when nothing matches
pub fn select(range: &str, versions: &[String], selection: Selection) -> anyhow::Result<Vec<Version>> {
    let range = VersionRange::parse(range).context("Invalid version range")?;
    let resolver = VersionResolver::from_strings(versions).context("Invalid candidate version")?;

    Ok(match selection {
        Selection::Latest => resolver.find_latest_compatible(&range).into_iter().collect(),
        Selection::Earliest => resolver.find_minimal_compatible(&range).into_iter().collect(),
        Selection::All => resolver.find_all_compatible(&range),
    })
}
