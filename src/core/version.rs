//! core::version
//!
//! Three-component version tuples used to filter installable package versions.
//!
//! # Normalization
//!
//! Every accepted input is reduced to `(major, minor, patch)`:
//!
//! - integers become `major.0.0`
//! - reals are rendered to a string first, then parsed as one
//! - strings are split on `.`; each component is cut at its first `-`, so the
//!   qualifier in `"8.1-dev"` is dropped rather than kept as metadata
//! - missing trailing components default to `0`
//!
//! Ordering is plain lexicographic tuple ordering. A qualifier never takes part
//! in it: `"8.1-dev"` and `"8.1"` compare equal.
//!
//! # Example
//!
//! ```
//! use dotfiles::core::version::VersionTuple;
//!
//! let dev: VersionTuple = "8.1-dev".parse().unwrap();
//! assert_eq!(dev, VersionTuple::new(8, 1, 0));
//! assert!(dev.greater_than(&VersionTuple::try_from(7.4).unwrap()));
//! assert_eq!(dev.to_string(), "8.1.0");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from version normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionFormatError {
    #[error("Can not convert \"{0}\" to a version.")]
    Malformed(String),

    #[error("a version needs 1 to 3 components, got {0}")]
    Arity(usize),
}

/// A released software version as an ordered `(major, minor, patch)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VersionTuple {
    major: u64,
    minor: u64,
    patch: u64,
}

impl VersionTuple {
    /// Create a version from its three components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string.
    ///
    /// Equivalent to `s.parse()`; kept as a named constructor because call
    /// sites filtering candidate lists read better with it.
    pub fn parse(s: &str) -> Result<Self, VersionFormatError> {
        s.parse()
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The normalized triple.
    pub fn as_tuple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Three-way comparison on the normalized triples.
    ///
    /// `Ordering::Less`, `Equal` and `Greater` stand for -1, 0 and 1.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.as_tuple().cmp(&other.as_tuple())
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }

    pub fn not_equal(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Equal
    }

    pub fn less_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn less_or_equal(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Greater
    }

    pub fn greater_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn greater_or_equal(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Less
    }

    /// Build from 1 to 3 numeric components, zero-filling the rest.
    fn from_components(parts: &[u64]) -> Result<Self, VersionFormatError> {
        match *parts {
            [major] => Ok(Self::new(major, 0, 0)),
            [major, minor] => Ok(Self::new(major, minor, 0)),
            [major, minor, patch] => Ok(Self::new(major, minor, patch)),
            _ => Err(VersionFormatError::Arity(parts.len())),
        }
    }
}

/// Reduce one dotted component to an integer, discarding any `-qualifier`.
fn component(raw: &str) -> Option<u64> {
    let number = match raw.split_once('-') {
        Some((head, _qualifier)) => head,
        None => raw,
    };
    number.trim().parse().ok()
}

impl FromStr for VersionTuple {
    type Err = VersionFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(component)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| VersionFormatError::Malformed(s.to_string()))?;

        // Extra components are tolerated and ignored.
        let len = parts.len().min(3);
        Self::from_components(&parts[..len])
    }
}

impl TryFrom<&str> for VersionTuple {
    type Error = VersionFormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for VersionTuple {
    type Error = VersionFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i64> for VersionTuple {
    type Error = VersionFormatError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(|major| Self::new(major, 0, 0))
            .map_err(|_| VersionFormatError::Malformed(value.to_string()))
    }
}

impl TryFrom<f64> for VersionTuple {
    type Error = VersionFormatError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(VersionFormatError::Malformed(value.to_string()));
        }
        value.to_string().parse()
    }
}

impl TryFrom<&[u64]> for VersionTuple {
    type Error = VersionFormatError;

    fn try_from(value: &[u64]) -> Result<Self, Self::Error> {
        Self::from_components(value)
    }
}

impl From<(u64, u64)> for VersionTuple {
    fn from((major, minor): (u64, u64)) -> Self {
        Self::new(major, minor, 0)
    }
}

impl From<(u64, u64, u64)> for VersionTuple {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Self::new(major, minor, patch)
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionTuple {
        s.parse().unwrap()
    }

    #[test]
    fn qualifier_on_last_segment_is_dropped() {
        assert_eq!(v("8.1-dev"), VersionTuple::new(8, 1, 0));
        assert_eq!(v("7.4-beta"), VersionTuple::new(7, 4, 0));
        assert_eq!(v("8.2.3-rc1"), VersionTuple::new(8, 2, 3));
    }

    #[test]
    fn integer_becomes_major() {
        assert_eq!(VersionTuple::try_from(8i64).unwrap(), VersionTuple::new(8, 0, 0));
        assert_eq!(v("8"), VersionTuple::new(8, 0, 0));
    }

    #[test]
    fn real_is_parsed_through_its_string_form() {
        assert_eq!(VersionTuple::try_from(7.4).unwrap(), VersionTuple::new(7, 4, 0));
        assert_eq!(VersionTuple::try_from(8.0).unwrap(), VersionTuple::new(8, 0, 0));
    }

    #[test]
    fn short_sequences_are_zero_filled() {
        assert_eq!(VersionTuple::from((8, 1)), VersionTuple::new(8, 1, 0));
        let parts: &[u64] = &[8];
        assert_eq!(VersionTuple::try_from(parts).unwrap(), VersionTuple::new(8, 0, 0));
    }

    #[test]
    fn sequences_outside_one_to_three_are_rejected() {
        let empty: &[u64] = &[];
        let long: &[u64] = &[1, 2, 3, 4];
        assert_eq!(
            VersionTuple::try_from(empty),
            Err(VersionFormatError::Arity(0))
        );
        assert_eq!(
            VersionTuple::try_from(long),
            Err(VersionFormatError::Arity(4))
        );
    }

    #[test]
    fn extra_string_components_are_ignored() {
        assert_eq!(v("1.2.3.4"), VersionTuple::new(1, 2, 3));
        assert!("1.2.3.x".parse::<VersionTuple>().is_err());
    }

    #[test]
    fn malformed_inputs_fail() {
        for input in ["abc", "", "8.", ".1", "8.x", "-dev", "8..1"] {
            assert!(
                input.parse::<VersionTuple>().is_err(),
                "expected {input:?} to be rejected"
            );
        }
        assert!(VersionTuple::try_from(-1i64).is_err());
        assert!(VersionTuple::try_from(f64::NAN).is_err());
        assert!(VersionTuple::try_from(-7.4).is_err());
    }

    #[test]
    fn error_message_names_the_input() {
        let err = "abc".parse::<VersionTuple>().unwrap_err();
        assert_eq!(err.to_string(), "Can not convert \"abc\" to a version.");
    }

    #[test]
    fn predicates_agree_with_compare() {
        let a = v("7.4");
        let b = v("8.0");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert!(a.less_than(&b) && a.less_or_equal(&b) && a.not_equal(&b));
        assert!(b.greater_than(&a) && b.greater_or_equal(&a));
        assert!(a.equal(&v("7.4.0")) && a.less_or_equal(&v("7.4")) && a.greater_or_equal(&v("7.4")));
        assert!(!a.greater_than(&a));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(v("8.0") > v("7.10"));
        assert!(v("7.10") > v("7.4"));
        assert!(v("1.2.10") > v("1.2.9"));
    }

    #[test]
    fn display_renders_all_three_components() {
        assert_eq!(v("8.1").to_string(), "8.1.0");
        assert_eq!(VersionTuple::new(5, 6, 40).to_string(), "5.6.40");
    }
}
