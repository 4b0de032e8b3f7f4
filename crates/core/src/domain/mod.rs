// Domain Layer - Pure editor entities

pub mod asset;
pub mod error;
pub mod library;
pub mod upload;

// Re-exports
pub use asset::AssetFile;
pub use error::DomainError;
pub use library::{
    effective_restriction, EditorLibrary, LibraryDetails, LibraryRef, LibraryVersion,
    StoredLibrary,
};
pub use upload::validate_upload_path;
