// SQLite TmpFileRepository Implementation

use crate::config::TablePrefix;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use h5p_editor_core::error::Result;
use h5p_editor_core::port::TmpFileRepository;
use sqlx::SqlitePool;
use tracing::debug;

pub struct SqliteTmpFileRepository {
    pool: SqlitePool,
    table: String,
}

impl SqliteTmpFileRepository {
    pub fn new(pool: SqlitePool, prefix: &TablePrefix) -> Self {
        Self {
            pool,
            table: prefix.table("h5p_tmpfiles"),
        }
    }
}

#[async_trait]
impl TmpFileRepository for SqliteTmpFileRepository {
    async fn insert(&self, path: &str, created_at: i64) -> Result<()> {
        let sql = format!("INSERT INTO {} (path, created_at) VALUES (?, ?)", self.table);
        sqlx::query(&sql)
            .bind(path)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_by_path(&self, path: &str) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE path = ?", self.table);
        let result = sqlx::query(&sql)
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_older_than(&self, cutoff: i64) -> Result<Vec<String>> {
        // Select and delete under one transaction so the returned paths match the deleted rows
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let select = format!(
            "SELECT path FROM {} WHERE created_at < ? ORDER BY created_at, id",
            self.table
        );
        let paths: Vec<String> = sqlx::query_scalar(&select)
            .bind(cutoff)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let delete = format!("DELETE FROM {} WHERE created_at < ?", self.table);
        let result = sqlx::query(&delete)
            .bind(cutoff)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            cutoff = cutoff,
            deleted = result.rows_affected(),
            "Deleted expired temporary files"
        );

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteStoreConfig};

    async fn setup_repo() -> (SqlitePool, SqliteTmpFileRepository) {
        let pool = create_pool(&SqliteStoreConfig::default()).await.unwrap();
        run_migrations(&pool, &TablePrefix::default()).await.unwrap();
        let repo = SqliteTmpFileRepository::new(pool.clone(), &TablePrefix::default());
        (pool, repo)
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM wp_h5p_tmpfiles")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_by_path() {
        let (pool, repo) = setup_repo().await;
        repo.insert("content/1/images/a.png", 100).await.unwrap();
        repo.insert("content/1/images/b.png", 100).await.unwrap();

        assert_eq!(repo.delete_by_path("content/1/images/a.png").await.unwrap(), 1);
        assert_eq!(repo.delete_by_path("content/1/images/a.png").await.unwrap(), 0);
        assert_eq!(repo.delete_by_path("unknown.png").await.unwrap(), 0);
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let (pool, repo) = setup_repo().await;
        repo.insert("old-2.png", 20).await.unwrap();
        repo.insert("old-1.png", 10).await.unwrap();
        repo.insert("fresh.png", 500).await.unwrap();

        let purged = repo.delete_older_than(100).await.unwrap();

        assert_eq!(purged, vec!["old-1.png".to_string(), "old-2.png".to_string()]);
        assert_eq!(count(&pool).await, 1);
        assert!(repo.delete_older_than(100).await.unwrap().is_empty());
    }
}
