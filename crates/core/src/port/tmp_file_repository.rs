// Temporary File Repository Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Pending-deletion list for uploaded files that are not yet part of saved content
#[async_trait]
pub trait TmpFileRepository: Send + Sync {
    /// Record a file as temporary
    ///
    /// # Arguments
    /// * `path` - File identifier (path relative to the upload root)
    /// * `created_at` - Unix timestamp (seconds)
    async fn insert(&self, path: &str, created_at: i64) -> Result<()>;

    /// Remove a file from the list
    ///
    /// # Returns
    /// Number of rows deleted (0 if the file was not listed)
    async fn delete_by_path(&self, path: &str) -> Result<u64>;

    /// Remove all entries created before `cutoff` (unix seconds)
    ///
    /// # Returns
    /// Paths of the removed entries, so the caller can unlink the files
    async fn delete_older_than(&self, cutoff: i64) -> Result<Vec<String>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory pending-files list of (path, created_at)
    #[derive(Default)]
    pub struct InMemoryTmpFileRepository {
        files: Mutex<Vec<(String, i64)>>,
    }

    impl InMemoryTmpFileRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn paths(&self) -> Vec<String> {
            self.files
                .lock()
                .unwrap()
                .iter()
                .map(|(path, _)| path.clone())
                .collect()
        }
    }

    #[async_trait]
    impl TmpFileRepository for InMemoryTmpFileRepository {
        async fn insert(&self, path: &str, created_at: i64) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .push((path.to_string(), created_at));
            Ok(())
        }

        async fn delete_by_path(&self, path: &str) -> Result<u64> {
            let mut files = self.files.lock().unwrap();
            let before = files.len();
            files.retain(|(p, _)| p != path);
            Ok((before - files.len()) as u64)
        }

        async fn delete_older_than(&self, cutoff: i64) -> Result<Vec<String>> {
            let mut files = self.files.lock().unwrap();
            let (expired, kept): (Vec<_>, Vec<_>) =
                files.drain(..).partition(|(_, created_at)| *created_at < cutoff);
            *files = kept;
            Ok(expired.into_iter().map(|(path, _)| path).collect())
        }
    }
}
