// H5P Editor Infrastructure - SQLite Adapter
// Implements: LibraryRepository, TmpFileRepository

mod config;
mod connection;
mod error;
mod library_repository;
mod migration;
mod tmp_file_repository;

pub use config::{SqliteStoreConfig, TablePrefix};
pub use connection::create_pool;
pub use library_repository::SqliteLibraryRepository;
pub use migration::run_migrations;
pub use tmp_file_repository::SqliteTmpFileRepository;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
