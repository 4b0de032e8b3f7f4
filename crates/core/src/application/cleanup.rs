// Temporary File Cleanup
// Purges uploads that were never claimed by saved content

use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TmpFileRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Cleanup configuration
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Temporary files older than this are considered abandoned
    pub max_age: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60), // 1 day
        }
    }
}

/// Removes expired entries from the temporary-files list
pub struct TmpFileCleanup {
    tmp_files: Arc<dyn TmpFileRepository>,
    time_provider: Arc<dyn TimeProvider>,
    config: CleanupConfig,
}

impl TmpFileCleanup {
    pub fn new(
        tmp_files: Arc<dyn TmpFileRepository>,
        time_provider: Arc<dyn TimeProvider>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            tmp_files,
            time_provider,
            config,
        }
    }

    /// Delete expired entries
    ///
    /// # Returns
    /// Paths of the purged files. Unlinking them is up to the caller.
    pub async fn purge_expired(&self) -> Result<Vec<String>> {
        let max_age = i64::try_from(self.config.max_age.as_secs())
            .map_err(|_| AppError::Config("cleanup max age out of range".to_string()))?;
        let cutoff = self.time_provider.now_secs().saturating_sub(max_age);

        let purged = self.tmp_files.delete_older_than(cutoff).await?;

        info!(
            cutoff = cutoff,
            purged = purged.len(),
            "Temporary file cleanup completed"
        );

        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::tmp_file_repository::mocks::InMemoryTmpFileRepository;

    #[tokio::test]
    async fn test_purge_expired_keeps_recent_files() {
        let now = 1_700_000_000;
        let repo = Arc::new(InMemoryTmpFileRepository::new());
        repo.insert("old.png", now - 2 * 86_400).await.unwrap();
        repo.insert("edge.png", now - 86_400).await.unwrap();
        repo.insert("fresh.png", now - 60).await.unwrap();

        let cleanup = TmpFileCleanup::new(
            repo.clone(),
            Arc::new(FixedTimeProvider(now)),
            CleanupConfig::default(),
        );

        let purged = cleanup.purge_expired().await.unwrap();

        assert_eq!(purged, vec!["old.png".to_string()]);
        assert_eq!(
            repo.paths(),
            vec!["edge.png".to_string(), "fresh.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_purge_with_custom_max_age() {
        let now = 10_000;
        let repo = Arc::new(InMemoryTmpFileRepository::new());
        repo.insert("a.png", now - 120).await.unwrap();
        repo.insert("b.png", now - 30).await.unwrap();

        let cleanup = TmpFileCleanup::new(
            repo.clone(),
            Arc::new(FixedTimeProvider(now)),
            CleanupConfig {
                max_age: Duration::from_secs(60),
            },
        );

        assert_eq!(cleanup.purge_expired().await.unwrap(), vec!["a.png".to_string()]);
        assert!(cleanup.purge_expired().await.unwrap().is_empty());
    }
}
