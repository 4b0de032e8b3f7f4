// Migration Runner

use crate::config::TablePrefix;
use crate::error::map_sqlx_error;
use h5p_editor_core::error::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Versioned migrations, applied in order
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Initial editor schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Run database migrations for the tables under `prefix`
pub async fn run_migrations(pool: &SqlitePool, prefix: &TablePrefix) -> Result<()> {
    info!(prefix = %prefix, "Running database migrations...");

    let version_table = prefix.table("h5p_schema_version");

    // Check if schema_version table exists
    let table_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(&version_table)
            .fetch_one(pool)
            .await
            .map_err(map_sqlx_error)?;

    let current_version: i64 = if table_exists > 0 {
        let latest = format!(
            "SELECT version FROM {} ORDER BY version DESC LIMIT 1",
            version_table
        );
        sqlx::query_scalar(&latest)
            .fetch_optional(pool)
            .await
            .map_err(map_sqlx_error)?
            .unwrap_or(0)
    } else {
        0
    };

    info!("Current schema version: {}", current_version);

    for (version, description, sql) in MIGRATIONS {
        if current_version < *version {
            info!("Applying migration {:03}: {}", version, description);
            apply_migration(pool, &prefix.apply(sql)).await?;
        }
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Apply a single migration SQL file
async fn apply_migration(pool: &SqlitePool, sql: &str) -> Result<()> {
    // Execute migration in a transaction
    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;

    // Split by semicolon and execute each statement
    for statement in sql.split(';') {
        // Remove comments and trim
        let clean_statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if !clean_statement.is_empty() {
            sqlx::query(&clean_statement)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
    }

    tx.commit().await.map_err(map_sqlx_error)?;
    Ok(())
}
