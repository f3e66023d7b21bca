//! Plugin versioning utilities

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic version reported through the plugin's `Version()` entry point
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginVersion(Version);

impl PluginVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Create from a version string
    pub fn parse(version_str: &str) -> Result<Self, semver::Error> {
        // Strip leading 'v' if present
        let version_str = version_str.strip_prefix('v').unwrap_or(version_str);
        Ok(Self(Version::parse(version_str)?))
    }

    /// Get the tag string (e.g., "v1.0.0")
    pub fn tag_string(&self) -> String {
        format!("v{}", self.0)
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v = PluginVersion::parse("1.0.0").unwrap();
        assert_eq!(v.to_string(), "1.0.0");
        assert_eq!(v.tag_string(), "v1.0.0");
        assert_eq!(v, PluginVersion::new(1, 0, 0));
    }

    #[test]
    fn test_version_with_v_prefix() {
        let v = PluginVersion::parse("v2.3.4").unwrap();
        assert_eq!(v.to_string(), "2.3.4");
        assert!(PluginVersion::parse("one").is_err());
    }
}
