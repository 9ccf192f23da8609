//! Semantic version value substituted into path and URL templates.
//!
//! A [`DotslashVersion`] is an immutable `major.minor.patch` triple. Its
//! [`Display`](fmt::Display) form is the canonical `"{major}.{minor}.{patch}"`
//! string used both in the manifest name and in `{version}` placeholders.
//! Components are unsigned, so negative versions cannot be constructed; the
//! string parser rejects a leading sign outright.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The version string was empty or only whitespace.
    #[error("version string is empty")]
    Empty,

    /// The version string did not have exactly three components.
    #[error("invalid version \"{value}\": expected major.minor.patch, found {count} component(s)")]
    WrongComponentCount {
        /// The rejected version string.
        value: String,
        /// Number of components found.
        count: usize,
    },

    /// A component was not a non-negative decimal integer.
    #[error("invalid version \"{value}\": component \"{component}\" is not a non-negative integer")]
    InvalidComponent {
        /// The rejected version string.
        value: String,
        /// The offending component.
        component: String,
    },
}

/// An immutable `major.minor.patch` version.
///
/// # Examples
///
/// ```
/// use dotslash_gen::version::DotslashVersion;
///
/// let version = DotslashVersion::new(1, 2, 3);
/// assert_eq!(version.to_string(), "1.2.3");
/// assert_eq!(version.major(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotslashVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl DotslashVersion {
    /// Construct a version from its three components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Return the major component.
    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    /// Return the minor component.
    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }

    /// Return the patch component.
    #[must_use]
    pub const fn patch(self) -> u32 {
        self.patch
    }
}

impl fmt::Display for DotslashVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for DotslashVersion {
    type Err = VersionError;

    /// Parse a `major.minor.patch` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotslash_gen::version::DotslashVersion;
    ///
    /// let version: DotslashVersion = "0.14.2".parse().expect("valid version");
    /// assert_eq!(version, DotslashVersion::new(0, 14, 2));
    /// assert!("1.2".parse::<DotslashVersion>().is_err());
    /// assert!("-1.2.3".parse::<DotslashVersion>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let components: Vec<&str> = trimmed.split('.').collect();
        let [major, minor, patch] = components.as_slice() else {
            return Err(VersionError::WrongComponentCount {
                value: trimmed.to_owned(),
                count: components.len(),
            });
        };

        Ok(Self::new(
            parse_component(trimmed, major)?,
            parse_component(trimmed, minor)?,
            parse_component(trimmed, patch)?,
        ))
    }
}

/// Parse one component, accepting only ASCII digits.
///
/// `u32::from_str` alone would accept a leading `+`, so digits are checked
/// explicitly first.
fn parse_component(value: &str, component: &str) -> Result<u32, VersionError> {
    let invalid = || VersionError::InvalidComponent {
        value: value.to_owned(),
        component: component.to_owned(),
    };
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    component.parse().map_err(|_| invalid())
}

impl Serialize for DotslashVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DotslashVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
