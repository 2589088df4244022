//! Semantic version type with rkyv support.
//!
//! Provides a strict `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` Version that
//! follows SemVer precedence rules. Build metadata is carried for display but
//! never takes part in ordering, equality or hashing.

use rkyv::{Archive, Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{ClydeError, ClydeResult};

/// Semantic version (major.minor.patch-prerelease+build)
#[derive(Debug, Clone, Archive, Deserialize, Serialize)]
#[archive(check_bytes)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse a version string
    pub fn parse(input: &str) -> ClydeResult<Self> {
        input.parse()
    }

    /// Check if this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The `(major, minor, patch)` triple
    pub fn base(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Same version with prerelease and build metadata dropped
    pub fn without_prerelease(&self) -> Self {
        Self::new(self.major, self.minor, self.patch)
    }

    /// Coarse compatibility probe: true iff the major numbers match
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        self.major == other.major
    }

    /// Get the precedence for comparison (ignores build metadata)
    fn precedence_cmp(&self, other: &Self) -> Ordering {
        match self.base().cmp(&other.base()) {
            Ordering::Equal => match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less, // prerelease < normal
                (None, Some(_)) => Ordering::Greater, // normal > prerelease
                (Some(a), Some(b)) => compare_prerelease(a, b),
            },
            other => other,
        }
    }
}

/// Compare two dot-separated prerelease strings identifier by identifier
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => match compare_identifier(x, y) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
            // Fewer identifiers sorts lower
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => compare_numeric(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Integer comparison on digit strings of any length.
///
/// Falls back to the raw text when the values are equal so that `01` and `1`
/// stay distinct, keeping `Ord` consistent with `Eq`.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_digits = a.trim_start_matches('0');
    let b_digits = b.trim_start_matches('0');

    a_digits
        .len()
        .cmp(&b_digits.len())
        .then_with(|| a_digits.cmp(b_digits))
        .then_with(|| a.cmp(b))
}

fn is_numeric(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Dot-separated `[0-9A-Za-z-]+` identifiers
fn is_valid_identifiers(value: &str) -> bool {
    value.split('.').all(|identifier| {
        !identifier.is_empty()
            && identifier
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// `0` or a digit sequence without a leading zero
fn parse_component(component: &str) -> Option<u64> {
    if !is_numeric(component) || (component.len() > 1 && component.starts_with('0')) {
        return None;
    }
    component.parse().ok()
}

impl FromStr for Version {
    type Err = ClydeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClydeError::InvalidVersionFormat {
            input: s.to_string(),
        };

        // Split on '+' for build metadata
        let (version_part, build) = match s.split_once('+') {
            Some((v, b)) => (v, Some(b)),
            None => (s, None),
        };

        // Split on the first '-' for prerelease; identifiers may contain '-'
        let (core_part, prerelease) = match version_part.split_once('-') {
            Some((c, p)) => (c, Some(p)),
            None => (version_part, None),
        };

        if prerelease.is_some_and(|p| !is_valid_identifiers(p))
            || build.is_some_and(|b| !is_valid_identifiers(b))
        {
            return Err(invalid());
        }

        // Parse major.minor.patch
        let mut parts = core_part.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Version {
            major: parse_component(major).ok_or_else(invalid)?,
            minor: parse_component(minor).ok_or_else(invalid)?,
            patch: parse_component(patch).ok_or_else(invalid)?,
            prerelease: prerelease.map(str::to_string),
            build: build.map(str::to_string),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }

        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }

        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.base() == other.base() && self.prerelease == other.prerelease
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base().hash(state);
        self.prerelease.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence_cmp(other)
    }
}

impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn identifiers() -> impl Strategy<Value = String> {
        "[0-9A-Za-z-]{1,6}(\\.[0-9A-Za-z-]{1,6}){0,3}"
    }

    fn version_string() -> impl Strategy<Value = String> {
        (
            0u64..1000,
            0u64..1000,
            0u64..1000,
            prop::option::of(identifiers()),
            prop::option::of(identifiers()),
        )
            .prop_map(|(major, minor, patch, pre, build)| {
                let mut s = format!("{}.{}.{}", major, minor, patch);
                if let Some(pre) = pre {
                    s.push('-');
                    s.push_str(&pre);
                }
                if let Some(build) = build {
                    s.push('+');
                    s.push_str(&build);
                }
                s
            })
    }

    proptest! {
        #[test]
        fn version_round_trip(input in version_string()) {
            let parsed = Version::from_str(&input).unwrap();
            prop_assert_eq!(parsed.to_string(), input);
        }

        #[test]
        fn version_order_is_total(a in version_string(), b in version_string()) {
            let a = Version::from_str(&a).unwrap();
            let b = Version::from_str(&b).unwrap();

            let outcomes = [a < b, a == b, a > b];
            prop_assert_eq!(outcomes.iter().filter(|&&x| x).count(), 1);
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }

        #[test]
        fn version_comparison_transitivity(
            a in version_string(),
            b in version_string(),
            c in version_string(),
        ) {
            let mut sorted = [
                Version::from_str(&a).unwrap(),
                Version::from_str(&b).unwrap(),
                Version::from_str(&c).unwrap(),
            ];
            sorted.sort();

            prop_assert!(sorted[0] <= sorted[1]);
            prop_assert!(sorted[1] <= sorted[2]);
            prop_assert!(sorted[0] <= sorted[2]);
        }
    }
}
