// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid library name: {0:?}")]
    InvalidLibraryName(String),

    #[error("Invalid library version: {0:?}")]
    InvalidVersion(String),

    #[error("Upload path must be relative to the upload directory: {0:?}")]
    UnsafeUploadPath(String),

    #[error("Invalid library reference: {0:?} (expected \"<machineName> <major>.<minor>\")")]
    InvalidLibraryRef(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
