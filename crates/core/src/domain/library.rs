// Library Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a library machine name
const MAX_NAME_LEN: usize = 255;

/// Library version as seen by the editor (major.minor)
///
/// Ordering is lexicographic on (major, minor), so `a > b` means "a is a strictly newer
/// version than b". Patch versions never take part in editor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
}

impl LibraryVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// True if `self` is strictly newer than `other`
    pub fn is_newer_than(&self, other: &LibraryVersion) -> bool {
        self > other
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LibraryVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DomainError::InvalidVersion(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// A library requested by name and version
///
/// Serialized in the editor's wire shape (`name`, `majorVersion`, `minorVersion`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    pub name: String,
    pub major_version: u32,
    pub minor_version: u32,
}

impl LibraryRef {
    pub fn new(name: impl Into<String>, major_version: u32, minor_version: u32) -> Self {
        Self {
            name: name.into(),
            major_version,
            minor_version,
        }
    }

    pub fn version(&self) -> LibraryVersion {
        LibraryVersion::new(self.major_version, self.minor_version)
    }
}

/// Machine names are word characters, digits, dashes and dots (e.g. `H5P.MultiChoice`)
fn validate_machine_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidLibraryName(name.to_string()))
    }
}

impl fmt::Display for LibraryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version())
    }
}

/// Parses the editor's "uber name" form: `H5P.MultiChoice 1.16`
impl FromStr for LibraryRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, version) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| DomainError::InvalidLibraryRef(s.to_string()))?;

        validate_machine_name(name)?;
        let version: LibraryVersion = version.trim().parse()?;

        Ok(Self::new(name, version.major, version.minor))
    }
}

/// Details loaded for a single requested library (filtered mode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDetails {
    pub title: String,
    pub runnable: bool,
    /// Stored restriction bit, before the caller's privilege is applied
    pub restricted: bool,
    pub tutorial_url: Option<String>,
}

/// A runnable library row as loaded for the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLibrary {
    pub name: String,
    pub title: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub tutorial_url: Option<String>,
    /// Stored restriction bit, before the caller's privilege is applied
    pub restricted: bool,
}

/// Restriction as presented to the caller: privileged callers are never restricted
pub fn effective_restriction(stored: bool, privileged: bool) -> bool {
    !privileged && stored
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Library as presented to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorLibrary {
    pub name: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub title: String,
    pub runnable: bool,
    pub restricted: bool,
    pub tutorial_url: Option<String>,

    /// Set in catalog listings when a newer version of the same library exists
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_old: bool,
}

impl EditorLibrary {
    /// Augment a requested library with its stored details
    pub fn from_request(request: LibraryRef, details: LibraryDetails, privileged: bool) -> Self {
        Self {
            name: request.name,
            major_version: request.major_version,
            minor_version: request.minor_version,
            title: details.title,
            runnable: details.runnable,
            restricted: effective_restriction(details.restricted, privileged),
            tutorial_url: details.tutorial_url,
            is_old: false,
        }
    }

    /// Catalog rows are runnable by construction
    pub fn from_stored(stored: StoredLibrary, privileged: bool) -> Self {
        Self {
            name: stored.name,
            major_version: stored.major_version,
            minor_version: stored.minor_version,
            title: stored.title,
            runnable: true,
            restricted: effective_restriction(stored.restricted, privileged),
            tutorial_url: stored.tutorial_url,
            is_old: false,
        }
    }

    pub fn version(&self) -> LibraryVersion {
        LibraryVersion::new(self.major_version, self.minor_version)
    }

    pub fn library_ref(&self) -> LibraryRef {
        LibraryRef::new(self.name.clone(), self.major_version, self.minor_version)
    }
}
