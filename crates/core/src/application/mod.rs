// Application Layer - Use Cases

pub mod cleanup;
pub mod editor_storage;

// Re-exports
pub use cleanup::{CleanupConfig, TmpFileCleanup};
pub use editor_storage::EditorStorage;
