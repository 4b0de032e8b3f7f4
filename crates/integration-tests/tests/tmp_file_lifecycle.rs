//! Temporary file lifecycle: track on upload, keep on save, purge when abandoned

use std::sync::Arc;
use std::time::Duration;

use h5p_editor_core::application::{CleanupConfig, EditorStorage, TmpFileCleanup};
use h5p_editor_core::port::time_provider::FixedTimeProvider;
use h5p_editor_core::port::{NoopAssetHook, StaticCapability};
use h5p_editor_sqlite::{
    create_pool, run_migrations, SqliteLibraryRepository, SqliteStoreConfig,
    SqliteTmpFileRepository, TablePrefix,
};
use sqlx::SqlitePool;

const NOW: i64 = 1_700_000_000;

async fn setup() -> (SqlitePool, Arc<SqliteTmpFileRepository>) {
    let pool = create_pool(&SqliteStoreConfig::default()).await.unwrap();
    run_migrations(&pool, &TablePrefix::default()).await.unwrap();
    let tmp_files = Arc::new(SqliteTmpFileRepository::new(
        pool.clone(),
        &TablePrefix::default(),
    ));
    (pool, tmp_files)
}

fn storage_at(pool: &SqlitePool, tmp_files: Arc<SqliteTmpFileRepository>, now: i64) -> EditorStorage {
    EditorStorage::new(
        Arc::new(SqliteLibraryRepository::new(
            pool.clone(),
            &TablePrefix::default(),
        )),
        tmp_files,
        Arc::new(StaticCapability::new(false)),
        Arc::new(NoopAssetHook),
        Arc::new(FixedTimeProvider(now)),
    )
}

async fn tracked_paths(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT path FROM wp_h5p_tmpfiles ORDER BY path")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_keep_file_removes_only_matching_entry() {
    let (pool, tmp_files) = setup().await;
    let store = storage_at(&pool, tmp_files, NOW);

    store.mark_file_for_cleanup("content/7/images/a.png").await.unwrap();
    store.mark_file_for_cleanup("content/7/images/b.png").await.unwrap();

    store.mark_file_permanent("content/7/images/a.png").await.unwrap();

    assert_eq!(tracked_paths(&pool).await, vec!["content/7/images/b.png"]);
}

#[tokio::test]
async fn test_keep_file_twice_and_unknown_is_safe() {
    let (pool, tmp_files) = setup().await;
    let store = storage_at(&pool, tmp_files, NOW);

    store.mark_file_for_cleanup("content/7/images/a.png").await.unwrap();

    store.mark_file_permanent("content/7/images/a.png").await.unwrap();
    store.mark_file_permanent("content/7/images/a.png").await.unwrap();
    store.mark_file_permanent("never/tracked.png").await.unwrap();

    assert!(tracked_paths(&pool).await.is_empty());
}

#[tokio::test]
async fn test_abandoned_uploads_are_purged() {
    let (pool, tmp_files) = setup().await;

    // Uploaded two days ago and never saved
    storage_at(&pool, tmp_files.clone(), NOW - 2 * 86_400)
        .mark_file_for_cleanup("editor/images/abandoned.png")
        .await
        .unwrap();
    // Uploaded two days ago and saved with content
    let old_store = storage_at(&pool, tmp_files.clone(), NOW - 2 * 86_400);
    old_store
        .mark_file_for_cleanup("editor/images/saved.png")
        .await
        .unwrap();
    old_store
        .mark_file_permanent("editor/images/saved.png")
        .await
        .unwrap();
    // Uploaded a minute ago
    storage_at(&pool, tmp_files.clone(), NOW - 60)
        .mark_file_for_cleanup("editor/images/in-progress.png")
        .await
        .unwrap();

    let cleanup = TmpFileCleanup::new(
        tmp_files,
        Arc::new(FixedTimeProvider(NOW)),
        CleanupConfig {
            max_age: Duration::from_secs(86_400),
        },
    );

    let purged = cleanup.purge_expired().await.unwrap();

    assert_eq!(purged, vec!["editor/images/abandoned.png"]);
    assert_eq!(tracked_paths(&pool).await, vec!["editor/images/in-progress.png"]);
}

#[tokio::test]
async fn test_paths_outside_upload_dir_are_never_tracked() {
    let (pool, tmp_files) = setup().await;
    let store = storage_at(&pool, tmp_files, NOW);

    for path in ["/etc/passwd", "../../home/u/.bashrc", "editor/../../secret"] {
        assert!(store.mark_file_for_cleanup(path).await.is_err());
    }

    assert!(tracked_paths(&pool).await.is_empty());
}
