//! Version selection over a candidate list
//!
//! Picks concrete versions out of the versions a registry advertises for a
//! package, and compares pairs of versions for major-level compatibility.

use std::collections::HashSet;

use tracing::trace;

use clyde_core::types::{Constraint, Op, Version, VersionRange};

use crate::ResolverResult;

/// Version resolver for selecting matching versions
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    /// Available versions sorted in ascending order
    available_versions: Vec<Version>,
}

impl VersionResolver {
    /// Create new version resolver with candidate versions.
    ///
    /// Candidates of equal precedence that differ in build metadata are all
    /// kept, in their input order; exact duplicates collapse to one.
    pub fn new(versions: Vec<Version>) -> Self {
        let mut seen = HashSet::new();
        let mut available_versions: Vec<Version> = versions
            .into_iter()
            .filter(|version| seen.insert(version.to_string()))
            .collect();
        available_versions.sort();

        Self { available_versions }
    }

    /// Create a resolver from advertised version strings
    pub fn from_strings<I, S>(versions: I) -> ResolverResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let versions = versions
            .into_iter()
            .map(|v| Version::parse(v.as_ref()))
            .collect::<ResolverResult<Vec<_>>>()?;
        Ok(Self::new(versions))
    }

    /// Candidates in ascending order
    pub fn versions(&self) -> impl DoubleEndedIterator<Item = &Version> {
        self.available_versions.iter()
    }

    /// Highest candidate
    pub fn latest(&self) -> Option<&Version> {
        self.available_versions.iter().next_back()
    }

    pub fn is_empty(&self) -> bool {
        self.available_versions.is_empty()
    }

    fn matching<'a>(&'a self, range: &'a VersionRange) -> impl DoubleEndedIterator<Item = &'a Version> {
        self.available_versions.iter().filter(move |version| {
            let matched = range.matches(version);
            trace!("{} against '{}': {}", version, range, matched);
            matched
        })
    }

    /// Select highest version matching the range
    pub fn find_latest_compatible(&self, range: &VersionRange) -> Option<Version> {
        self.matching(range).next_back().cloned()
    }

    /// Find all versions matching the range, lowest first
    pub fn find_all_compatible(&self, range: &VersionRange) -> Vec<Version> {
        self.matching(range).cloned().collect()
    }

    /// Select lowest version matching the range
    pub fn find_minimal_compatible(&self, range: &VersionRange) -> Option<Version> {
        self.matching(range).next().cloned()
    }

    /// Select highest version matching the range
    pub fn find_maximal_compatible(&self, range: &VersionRange) -> Option<Version> {
        self.find_latest_compatible(range)
    }

    /// Lowest and highest versions matching the range
    pub fn find_compatible_range(&self, range: &VersionRange) -> Option<(Version, Version)> {
        let min = self.find_minimal_compatible(range)?;
        let max = self.find_maximal_compatible(range)?;
        Some((min, max))
    }

    /// All matches newest first, each release followed by its own prereleases.
    ///
    /// Prereleases whose release did not match come last, newest first.
    pub fn find_all_compatible_grouped(&self, range: &VersionRange) -> Vec<Version> {
        let matches: Vec<&Version> = self.matching(range).collect();

        let releases: Vec<&Version> = matches
            .iter()
            .rev()
            .copied()
            .filter(|v| !v.is_prerelease())
            .collect();
        let release_bases: HashSet<(u64, u64, u64)> = releases.iter().map(|v| v.base()).collect();

        let mut grouped = Vec::with_capacity(matches.len());
        for release in &releases {
            grouped.push((*release).clone());
            grouped.extend(
                matches
                    .iter()
                    .rev()
                    .filter(|v| v.is_prerelease() && v.base() == release.base())
                    .map(|v| (*v).clone()),
            );
        }

        grouped.extend(
            matches
                .iter()
                .rev()
                .filter(|v| v.is_prerelease() && !release_bases.contains(&v.base()))
                .map(|v| (*v).clone()),
        );

        grouped
    }

    /// Lower of two versions, if they share a major
    pub fn minimal_compatible_between(a: &Version, b: &Version) -> Option<Version> {
        a.is_compatible_with(b).then(|| a.min(b).clone())
    }

    /// Higher of two versions, if they share a major
    pub fn maximal_compatible_between(a: &Version, b: &Version) -> Option<Version> {
        a.is_compatible_with(b).then(|| a.max(b).clone())
    }

    /// `>=min <=max` over two versions that share a major
    pub fn compatible_range_between(a: &Version, b: &Version) -> Option<VersionRange> {
        let min = Self::minimal_compatible_between(a, b)?;
        let max = Self::maximal_compatible_between(a, b)?;

        VersionRange::new(vec![
            Constraint::new(Op::GreaterEq, min),
            Constraint::new(Op::LessEq, max),
        ])
        .ok()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_version() -> impl Strategy<Value = Version> {
        (0u64..4, 0u64..4, 0u64..4).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
    }

    proptest! {
        #[test]
        fn selection_is_consistent(
            versions in prop::collection::vec(arb_version(), 0..20),
            bound in arb_version(),
        ) {
            let resolver = VersionResolver::new(versions);
            let req = VersionRange::new(vec![Constraint::new(Op::Caret, bound)]).unwrap();
            let all = resolver.find_all_compatible(&req);

            // Property: every selected version satisfies the range
            for version in &all {
                prop_assert!(req.matches(version));
            }

            // Property: ascending and duplicate free
            for pair in all.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }

            // Property: latest/minimal are the ends of the full match list
            prop_assert_eq!(resolver.find_latest_compatible(&req), all.last().cloned());
            prop_assert_eq!(resolver.find_minimal_compatible(&req), all.first().cloned());

            // Property: grouping only reorders
            let mut grouped = resolver.find_all_compatible_grouped(&req);
            grouped.reverse();
            prop_assert_eq!(grouped, all);
        }
    }
}
