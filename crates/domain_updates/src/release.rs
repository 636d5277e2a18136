//! Release records and version ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted-numeric version such as `1.2.10`.
///
/// Comparison pads the shorter side with zeros, so `1.2` equals `1.2.0`
/// and `1.10` sorts above `1.9`.
#[derive(Debug, Clone)]
pub struct Version(Vec<u32>);

impl Version {
    /// Parses a version, `None` when any segment is non-numeric.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(|segment| segment.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(Version)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A registered app release.
///
/// Stored under the composite key `platform#component#version`; field
/// names stay snake_case to match the mobile updater's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRelease {
    pub version: String,
    pub platform: String,
    pub component: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub release_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AppRelease {
    /// The composite storage key for this release.
    pub fn key(&self) -> String {
        release_key(&self.platform, &self.component, &self.version)
    }

    /// Parses this release's version, `None` when malformed.
    pub fn parsed_version(&self) -> Option<Version> {
        Version::parse(&self.version)
    }
}

/// Builds the composite storage key.
pub fn release_key(platform: &str, component: &str, version: &str) -> String {
    format!("{platform}#{component}#{version}")
}

/// Input for registering a release.
#[derive(Debug, Clone)]
pub struct RegisterRelease {
    pub version: String,
    pub platform: String,
    pub component: String,
    pub description: String,
    pub size_bytes: u64,
    pub critical: bool,
    pub download_url: String,
    pub checksum: String,
    pub dependencies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_ordering_is_numeric_per_segment() {
        assert!(v("1.2.1") > v("1.2"));
        assert!(v("1.10.0") > v("1.9.9"));
        assert!(v("2.0") > v("1.99.99"));
        assert_eq!(v("1.2"), v("1.2.0"));
    }

    #[test]
    fn test_malformed_versions_do_not_parse() {
        assert!(Version::parse("1.2.x").is_none());
        assert!(Version::parse("").is_none());
        assert!(Version::parse("beta").is_none());
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
    }

    #[test]
    fn test_release_key_shape() {
        assert_eq!(release_key("android", "all", "1.2.0"), "android#all#1.2.0");
    }
}
