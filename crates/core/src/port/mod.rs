// Port Layer - Interfaces for external dependencies

pub mod asset_hook;
pub mod capability;
pub mod library_repository;
pub mod time_provider;
pub mod tmp_file_repository;

// Re-exports
pub use asset_hook::{AssetAlterHook, NoopAssetHook, EDITOR_CHANNEL};
pub use capability::{CapabilityChecker, StaticCapability};
pub use library_repository::LibraryRepository;
pub use time_provider::TimeProvider;
pub use tmp_file_repository::TmpFileRepository;
