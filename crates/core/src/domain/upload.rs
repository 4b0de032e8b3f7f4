// Upload Path Validation

use super::error::{DomainError, Result};
use std::path::{Component, Path};

/// Check that a temporary file path stays inside the upload directory
///
/// Paths are relative to the upload root: absolute paths, drive prefixes and
/// `..` segments are rejected.
pub fn validate_upload_path(path: &str) -> Result<()> {
    let unsafe_path = || DomainError::UnsafeUploadPath(path.to_string());

    if path.trim().is_empty() {
        return Err(unsafe_path());
    }

    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                return Err(unsafe_path())
            }
        }
    }

    Ok(())
}
