//! Version resolution for the module manifest.
//!
//! A release request is either a literal `X.Y.Z` version, taken verbatim, or
//! one of the symbolic levels `major`, `minor` and `patch`, applied to the
//! version currently stored in the manifest.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version pattern is valid")
    })
}

/// Represents a semantic version with major, minor, and patch components.
///
/// Only the text is stored. Components are parsed as numbers when a bump
/// needs them, so a literal such as `"01.2.3"` or one with a 20-digit
/// component is written back exactly as given. Two versions are equal when
/// their text is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    text: String,
}

/// Represents the type of semantic version bump to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

/// A parsed release request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    Literal(Version),
    Bump(BumpLevel),
}

impl Version {
    /// Creates a new Version with the specified major, minor, and patch components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            text: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// Accepts ASCII `digits.digits.digits`, returning `None` otherwise.
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(Version::parse("1.2.3"), Some(Version::new(1, 2, 3)));
    /// assert_eq!(Version::parse("v1.2.3"), None);
    /// assert_eq!(Version::parse("1.2"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        if !version_pattern().is_match(text) {
            return None;
        }
        Some(Version {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The `(major, minor, patch)` components as written.
    pub fn components(&self) -> (&str, &str, &str) {
        let mut parts = self.text.splitn(3, '.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or_default();
        let patch = parts.next().unwrap_or_default();
        (major, minor, patch)
    }

    /// Bumps a version according to the specified level.
    ///
    /// Increments the requested component and resets lower components to 0:
    /// - **Major**: major += 1, minor = 0, patch = 0
    /// - **Minor**: minor += 1, patch = 0
    /// - **Patch**: patch += 1
    ///
    /// Components left in place keep their text. Only the incremented one is
    /// read as a `u64`; if it does not fit, or its successor does not, the
    /// result is `InvalidManifest`.
    pub fn bump(&self, level: BumpLevel) -> Result<Self> {
        let (major, minor, patch) = self.components();
        let text = match level {
            BumpLevel::Major => format!("{}.0.0", self.increment(major)?),
            BumpLevel::Minor => format!("{}.{}.0", major, self.increment(minor)?),
            BumpLevel::Patch => format!("{}.{}.{}", major, minor, self.increment(patch)?),
        };
        Ok(Version { text })
    }

    fn increment(&self, component: &str) -> Result<u64> {
        component
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                ReleaseError::invalid_manifest(format!(
                    "version {} is too large to bump",
                    self
                ))
            })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for BumpLevel {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpLevel::Major),
            "minor" => Ok(BumpLevel::Minor),
            "patch" => Ok(BumpLevel::Patch),
            other => Err(ReleaseError::InvalidVersionArgument(other.to_string())),
        }
    }
}

impl VersionRequest {
    /// Classifies a raw request. Empty input is `MissingVersion`; anything that
    /// is neither a literal version nor a known level is `InvalidVersionArgument`.
    pub fn parse(request: Option<&str>) -> Result<Self> {
        let request = match request {
            Some(r) if !r.is_empty() => r,
            _ => return Err(ReleaseError::MissingVersion),
        };

        if let Some(version) = Version::parse(request) {
            return Ok(VersionRequest::Literal(version));
        }

        request.parse::<BumpLevel>().map(VersionRequest::Bump)
    }
}

/// Computes the next manifest version.
///
/// # Arguments
/// * `request` - a literal `X.Y.Z` or one of `major`, `minor`, `patch`
/// * `current_version` - the version currently stored in the manifest
///
/// # Returns
/// * `Ok(Version)` - the target version, different from `current_version`
/// * `Err(MissingVersion)` - `request` absent or empty
/// * `Err(InvalidVersionArgument)` - unrecognized level
/// * `Err(InvalidManifest)` - a level was requested but `current_version` does not parse
///   or is too large to bump
/// * `Err(NoOpVersion)` - the target equals `current_version`
pub fn resolve_version(request: Option<&str>, current_version: &str) -> Result<Version> {
    let target = match VersionRequest::parse(request)? {
        VersionRequest::Literal(version) => version,
        VersionRequest::Bump(level) => {
            let current = Version::parse(current_version).ok_or_else(|| {
                ReleaseError::invalid_manifest(format!(
                    "current version '{}' is not X.Y.Z",
                    current_version
                ))
            })?;
            current.bump(level)?
        }
    };

    if target.as_str() == current_version {
        return Err(ReleaseError::NoOpVersion(target.to_string()));
    }

    Ok(target)
}
