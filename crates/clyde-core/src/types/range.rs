//! Version constraints and ranges.
//!
//! A [`VersionRange`] is an AND-combination of [`Constraint`]s parsed from a
//! whitespace-separated spec such as `>=1.2.0 <2.0.0` or `^1.4.0`.
//!
//! Prereleases are invisible to plain range comparisons: a candidate like
//! `1.3.0-beta` only satisfies a range that names a prerelease bound on the
//! same `major.minor.patch`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Version;
use crate::error::{ClydeError, ClydeResult};

/// Comparison operator for version constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Exact,     // =1.0.0
    Greater,   // >1.0.0
    GreaterEq, // >=1.0.0
    Less,      // <1.0.0
    LessEq,    // <=1.0.0
    Caret,     // ^1.0.0
    Tilde,     // ~1.0.0
}

/// Single `(operator, version)` test
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub op: Op,
    pub version: Version,
}

/// Ordered list of constraints that must all hold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    constraints: Vec<Constraint>,
}

impl Op {
    /// Operator prefixes, longest first so `>=` wins over `>`
    const PREFIXES: [(&'static str, Op); 7] = [
        (">=", Op::GreaterEq),
        ("<=", Op::LessEq),
        (">", Op::Greater),
        ("<", Op::Less),
        ("=", Op::Exact),
        ("^", Op::Caret),
        ("~", Op::Tilde),
    ];

    /// Textual form of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Exact => "=",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::Caret => "^",
            Op::Tilde => "~",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Op::Greater => ordering == Ordering::Greater,
            Op::GreaterEq => ordering != Ordering::Less,
            Op::Less => ordering == Ordering::Less,
            Op::LessEq => ordering != Ordering::Greater,
            // Only the ordering operators are evaluated through `holds`
            Op::Exact | Op::Caret | Op::Tilde => ordering == Ordering::Equal,
        }
    }
}

impl Constraint {
    /// Create a new constraint
    pub fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Parse a single constraint token such as `>=1.2.3` or `1.2.3`
    pub fn parse(input: &str) -> ClydeResult<Self> {
        let token = input.trim();
        if token.is_empty() {
            return Err(ClydeError::constraint(input, "empty constraint"));
        }

        let (op, version_str) = Op::PREFIXES
            .iter()
            .find_map(|(prefix, op)| token.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .unwrap_or((Op::Exact, token));

        let version = Version::from_str(version_str).map_err(|_| {
            ClydeError::constraint(input, format!("'{}' is not a valid version", version_str))
        })?;

        Ok(Self { op, version })
    }

    /// Check if a version matches this constraint.
    ///
    /// With `allow_prerelease` unset, a prerelease candidate only matches a
    /// range operator whose own version is a prerelease.
    pub fn matches(&self, version: &Version, allow_prerelease: bool) -> bool {
        if self.op == Op::Exact {
            return version == &self.version;
        }

        let base = version.without_prerelease();
        let bound = self.version.without_prerelease();

        if !self.matches_base(&base, &bound) {
            return false;
        }

        if !version.is_prerelease() {
            return true;
        }

        if !(self.version.is_prerelease() || allow_prerelease) {
            return false;
        }

        // Full precedence check once the bases agree
        match self.op {
            Op::Caret | Op::Tilde => version >= &self.version,
            op => op.holds(version.cmp(&self.version)),
        }
    }

    fn matches_base(&self, base: &Version, bound: &Version) -> bool {
        match self.op {
            Op::Exact => base == bound,
            Op::Greater | Op::GreaterEq | Op::Less | Op::LessEq => {
                self.op.holds(base.cmp(bound))
            },
            Op::Caret => {
                if base < bound || base.major != bound.major {
                    false
                } else if bound.major > 0 {
                    true
                } else if bound.minor > 0 {
                    base.minor == bound.minor
                } else {
                    base.minor == bound.minor && base.patch == bound.patch
                }
            },
            Op::Tilde => base >= bound && base.major == bound.major && base.minor == bound.minor,
        }
    }
}

impl VersionRange {
    /// Create a range from already-built constraints
    pub fn new(constraints: Vec<Constraint>) -> ClydeResult<Self> {
        if constraints.is_empty() {
            return Err(ClydeError::constraint("", "a range needs at least one constraint"));
        }
        Ok(Self { constraints })
    }

    /// Parse a whitespace-separated range spec
    pub fn parse(input: &str) -> ClydeResult<Self> {
        let constraints = input
            .split_whitespace()
            .map(Constraint::parse)
            .collect::<ClydeResult<Vec<_>>>()?;

        if constraints.is_empty() {
            return Err(ClydeError::constraint(input, "empty version range"));
        }

        Ok(Self { constraints })
    }

    /// The constraints in declaration order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Check if a version satisfies every constraint of this range
    pub fn matches(&self, version: &Version) -> bool {
        if !version.is_prerelease() {
            return self.constraints.iter().all(|c| c.matches(version, false));
        }

        // A prerelease needs a same-base prerelease bound in the range itself
        let names_prerelease = self
            .constraints
            .iter()
            .any(|c| c.version.is_prerelease() && c.version.base() == version.base());

        names_prerelease && self.constraints.iter().all(|c| c.matches(version, true))
    }
}

impl FromStr for Constraint {
    type Err = ClydeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for VersionRange {
    type Err = ClydeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", constraint)?;
        }
        Ok(())
    }
}

impl Serialize for VersionRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::from_str(s).unwrap()
    }

    fn range(s: &str) -> VersionRange {
        VersionRange::parse(s).unwrap()
    }

    #[test]
    fn test_constraint_parsing() {
        let cases = [
            ("=1.2.3", Op::Exact),
            ("1.2.3", Op::Exact),
            (">1.2.3", Op::Greater),
            (">=1.2.3", Op::GreaterEq),
            ("<1.2.3", Op::Less),
            ("<=1.2.3", Op::LessEq),
            ("^1.2.3", Op::Caret),
            ("~1.2.3", Op::Tilde),
        ];

        for (input, op) in cases {
            let constraint = Constraint::parse(input).unwrap();
            assert_eq!(constraint.op, op, "operator of {}", input);
            assert_eq!(constraint.version, v("1.2.3"));
        }
    }

    #[test]
    fn test_invalid_constraints() {
        for input in ["", ">=", "^1.2", "=>1.2.3", "~>1.2.3", "*", "latest", ">= 1.2.3", "^v1.0.0"] {
            assert!(
                matches!(Constraint::parse(input), Err(ClydeError::InvalidConstraintFormat { .. })),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_range_parsing() {
        let r = range(">=1.2.0   <2.0.0");
        assert_eq!(r.constraints().len(), 2);
        assert_eq!(r.to_string(), ">=1.2.0 <2.0.0");

        assert!(VersionRange::parse("").is_err());
        assert!(VersionRange::parse("   ").is_err());
        assert!(VersionRange::parse(">=1.0.0 garbage").is_err());
    }

    #[test]
    fn test_exact() {
        let r = range("1.2.3");
        assert!(r.matches(&v("1.2.3")));
        assert!(r.matches(&v("1.2.3+build")));
        assert!(!r.matches(&v("1.2.4")));
        assert!(!r.matches(&v("1.2.3-beta")));

        let r = range("=1.2.3-beta");
        assert!(r.matches(&v("1.2.3-beta")));
        assert!(!r.matches(&v("1.2.3")));
    }

    #[test]
    fn test_comparison_operators() {
        let v1_2_3 = v("1.2.3");
        let v1_2_4 = v("1.2.4");
        let v1_3_0 = v("1.3.0");

        let r = range(">1.2.3");
        assert!(!r.matches(&v1_2_3));
        assert!(r.matches(&v1_2_4));
        assert!(r.matches(&v1_3_0));

        let r = range(">=1.2.3");
        assert!(r.matches(&v1_2_3));
        assert!(r.matches(&v1_2_4));

        let r = range("<1.2.4");
        assert!(r.matches(&v1_2_3));
        assert!(!r.matches(&v1_2_4));
        assert!(!r.matches(&v1_3_0));

        let r = range("<=1.2.4");
        assert!(r.matches(&v1_2_4));
        assert!(!r.matches(&v1_3_0));
    }

    #[test]
    fn test_caret() {
        let r = range("^1.2.3");
        assert!(r.matches(&v("1.2.3")));
        assert!(r.matches(&v("1.9.9")));
        assert!(!r.matches(&v("2.0.0")));
        assert!(!r.matches(&v("1.2.2")));

        let r = range("^0.2.3");
        assert!(r.matches(&v("0.2.3")));
        assert!(r.matches(&v("0.2.9")));
        assert!(!r.matches(&v("0.3.0")));
        assert!(!r.matches(&v("0.2.2")));

        let r = range("^0.0.3");
        assert!(r.matches(&v("0.0.3")));
        assert!(!r.matches(&v("0.0.4")));
        assert!(!r.matches(&v("0.0.2")));
        assert!(!r.matches(&v("0.1.3")));
    }

    #[test]
    fn test_tilde() {
        let r = range("~1.2.3");
        assert!(r.matches(&v("1.2.3")));
        assert!(r.matches(&v("1.2.9")));
        assert!(!r.matches(&v("1.3.0")));
        assert!(!r.matches(&v("1.2.2")));
        assert!(!r.matches(&v("2.2.3")));
    }

    #[test]
    fn test_prerelease_exclusion() {
        assert!(!range(">=1.2.3").matches(&v("1.2.3-beta")));
        assert!(range(">=1.2.3-0").matches(&v("1.2.3-beta")));
        assert!(!range("^1.2.0").matches(&v("1.3.0-beta")));
        assert!(!range(">=1.0.0 <2.0.0").matches(&v("1.5.0-rc.1")));
    }

    #[test]
    fn test_prerelease_needs_same_base_bound() {
        let r = range(">=1.2.0-0 <2.0.0");
        assert!(r.matches(&v("1.2.0-beta")));
        assert!(r.matches(&v("1.2.0")));
        assert!(r.matches(&v("1.2.1")));
        // Different base from the named prerelease bound
        assert!(!r.matches(&v("1.4.0-beta")));
        assert!(!r.matches(&v("2.0.0-alpha")));
    }

    #[test]
    fn test_caret_prerelease_bound_keeps_its_base() {
        let r = range("^1.2.0-0");
        assert!(r.matches(&v("1.2.0-beta")));
        assert!(r.matches(&v("1.2.3")));
        assert!(!r.matches(&v("1.2.3-beta")));
        assert!(!r.matches(&v("1.3.0-rc.1")));
    }

    #[test]
    fn test_prerelease_precedence_within_bound() {
        let r = range(">=1.2.3-beta.2");
        assert!(r.matches(&v("1.2.3-beta.2")));
        assert!(r.matches(&v("1.2.3-beta.11")));
        assert!(r.matches(&v("1.2.3-rc.1")));
        assert!(!r.matches(&v("1.2.3-beta.1")));
        assert!(!r.matches(&v("1.2.3-alpha")));

        let r = range("^1.2.3-beta");
        assert!(r.matches(&v("1.2.3-rc.1")));
        assert!(!r.matches(&v("1.2.3-alpha")));
        assert!(r.matches(&v("1.8.0")));
    }

    #[test]
    fn test_constraint_allow_prerelease() {
        let c = Constraint::parse(">=1.2.3").unwrap();
        assert!(!c.matches(&v("1.2.4-beta"), false));
        assert!(c.matches(&v("1.2.4-beta"), true));
        // Base must still satisfy the bound
        assert!(!c.matches(&v("1.2.2-beta"), true));
    }

    #[test]
    fn test_range_display_round_trip() {
        for spec in ["^1.2.3", ">=1.2.0 <2.0.0", "=1.0.0-rc.1", "~0.4.0 <0.4.9"] {
            let parsed = range(spec);
            assert_eq!(parsed.to_string(), spec);
            assert_eq!(range(&parsed.to_string()), parsed);
        }
        assert_eq!(range("1.2.3").to_string(), "=1.2.3");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(VersionRange::new(Vec::new()).is_err());

        let r = VersionRange::new(vec![Constraint::new(Op::Caret, v("1.0.0"))]).unwrap();
        assert!(r.matches(&v("1.4.0")));
    }
}
