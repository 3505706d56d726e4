//! Dotted module versions and the hook naming convention.
//!
//! Versions are compared numerically, segment by segment. A shorter version
//! is padded with zero segments, so `1.2` and `1.2.0` are equal and both sort
//! before `1.2.1`. A segment that does not start with a digit counts as `0`;
//! trailing non-digit characters in a segment (`3-beta`) are ignored.

use crate::hooks::VERSION_METHOD_MARKER;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A dotted numeric version such as `1.4.0`.
///
/// Equality follows [`compare_versions`], not the raw text: `"1.2"` equals
/// `"1.2.0"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ModuleVersion {
    raw: String,
    segments: Vec<u64>,
}

impl ModuleVersion {
    /// Parse a version string. Never fails; see the module docs for how
    /// malformed segments are read.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = parse_segments(&raw);
        Self { raw, segments }
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric segments, without zero padding.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// True when the version text is empty (module not installed).
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl From<String> for ModuleVersion {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for ModuleVersion {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ModuleVersion> for String {
    fn from(version: ModuleVersion) -> Self {
        version.raw
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ModuleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ModuleVersion {}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_segments(&self.segments, &other.segments)
    }
}

fn parse_segments(version: &str) -> Vec<u64> {
    let version = version.trim();
    if version.is_empty() {
        return Vec::new();
    }
    version
        .split('.')
        .map(|segment| {
            let digits: String = segment
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if digits.is_empty() {
                0
            } else {
                digits.parse::<u64>().unwrap_or(u64::MAX)
            }
        })
        .collect()
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare two dotted version strings numerically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_segments(&parse_segments(a), &parse_segments(b))
}

/// Whether a hook targeting `target` has already been applied to an
/// environment at `installed`.
///
/// An absent or blank installed version means "not installed" and is lower
/// than every target, including `0.0.0`.
pub fn is_applied(installed: Option<&str>, target: &str) -> bool {
    match installed {
        Some(installed) if !installed.trim().is_empty() => {
            compare_versions(installed, target) != Ordering::Less
        }
        _ => false,
    }
}

/// Derive the target version encoded in a hook method name.
///
/// Returns `None` unless the name contains the `__v` marker anywhere. The
/// marker is removed and every remaining underscore becomes a dot:
/// `__v1_4_0` gives `1.4.0`.
pub fn version_from_method_name(method: &str) -> Option<String> {
    if !method.contains(VERSION_METHOD_MARKER) {
        return None;
    }
    Some(method.replace(VERSION_METHOD_MARKER, "").replace('_', "."))
}

/// Canonical hook method name for a version: `1.4.0` gives `__v1_4_0`.
pub fn method_name_for_version(version: &str) -> String {
    format!("{}{}", VERSION_METHOD_MARKER, version.trim().replace('.', "_"))
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
