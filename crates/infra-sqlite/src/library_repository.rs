// SQLite LibraryRepository Implementation

use crate::config::TablePrefix;
use crate::error::{map_sqlx_error, version_from_column};
use async_trait::async_trait;
use h5p_editor_core::domain::{LibraryDetails, LibraryRef, StoredLibrary};
use h5p_editor_core::error::Result;
use h5p_editor_core::port::LibraryRepository;
use sqlx::SqlitePool;
use tracing::debug;

/// Prefixed SQL, built once per repository
struct LibraryQueries {
    translation: String,
    translation_languages: String,
    editor_library: String,
    runnable_libraries: String,
}

impl LibraryQueries {
    fn new(prefix: &TablePrefix) -> Self {
        let libraries = prefix.table("h5p_libraries");
        let languages = prefix.table("h5p_libraries_languages");

        Self {
            translation: format!(
                r#"
                SELECT hlt.translation
                FROM {languages} hlt
                JOIN {libraries} hl ON hl.id = hlt.library_id
                WHERE hl.name = ?
                  AND hl.major_version = ?
                  AND hl.minor_version = ?
                  AND hlt.language_code = ?
                "#
            ),
            translation_languages: format!(
                r#"
                SELECT hlt.language_code
                FROM {languages} hlt
                JOIN {libraries} hl ON hl.id = hlt.library_id
                WHERE hl.name = ?
                  AND hl.major_version = ?
                  AND hl.minor_version = ?
                ORDER BY hlt.language_code
                "#
            ),
            editor_library: format!(
                r#"
                SELECT title, runnable, restricted, tutorial_url
                FROM {libraries}
                WHERE name = ?
                  AND major_version = ?
                  AND minor_version = ?
                  AND semantics IS NOT NULL
                "#
            ),
            runnable_libraries: format!(
                r#"
                SELECT name, title, major_version, minor_version, tutorial_url, restricted
                FROM {libraries}
                WHERE runnable = 1
                  AND semantics IS NOT NULL
                ORDER BY title
                "#
            ),
        }
    }
}

pub struct SqliteLibraryRepository {
    pool: SqlitePool,
    queries: LibraryQueries,
}

impl SqliteLibraryRepository {
    pub fn new(pool: SqlitePool, prefix: &TablePrefix) -> Self {
        Self {
            pool,
            queries: LibraryQueries::new(prefix),
        }
    }
}

#[async_trait]
impl LibraryRepository for SqliteLibraryRepository {
    async fn find_translation(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
        language_code: &str,
    ) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(&self.queries.translation)
            .bind(name)
            .bind(i64::from(major_version))
            .bind(i64::from(minor_version))
            .bind(language_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_translation_languages(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
    ) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(&self.queries.translation_languages)
            .bind(name)
            .bind(i64::from(major_version))
            .bind(i64::from(minor_version))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_editor_library(&self, library: &LibraryRef) -> Result<Option<LibraryDetails>> {
        let row = sqlx::query_as::<_, DetailsRow>(&self.queries.editor_library)
            .bind(&library.name)
            .bind(i64::from(library.major_version))
            .bind(i64::from(library.minor_version))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(DetailsRow::into_details))
    }

    async fn list_runnable_libraries(&self) -> Result<Vec<StoredLibrary>> {
        let rows = sqlx::query_as::<_, CatalogRow>(&self.queries.runnable_libraries)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(count = rows.len(), "Loaded runnable libraries");

        rows.into_iter().map(CatalogRow::into_stored).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DetailsRow {
    title: String,
    runnable: i64,   // SQLite boolean as integer
    restricted: i64, // SQLite boolean as integer
    tutorial_url: Option<String>,
}

impl DetailsRow {
    fn into_details(self) -> LibraryDetails {
        LibraryDetails {
            title: self.title,
            runnable: self.runnable != 0,
            restricted: self.restricted == 1,
            tutorial_url: self.tutorial_url,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    name: String,
    title: String,
    major_version: i64,
    minor_version: i64,
    tutorial_url: Option<String>,
    restricted: i64,
}

impl CatalogRow {
    fn into_stored(self) -> Result<StoredLibrary> {
        Ok(StoredLibrary {
            major_version: version_from_column(self.major_version, "major_version")?,
            minor_version: version_from_column(self.minor_version, "minor_version")?,
            name: self.name,
            title: self.title,
            tutorial_url: self.tutorial_url,
            restricted: self.restricted == 1,
        })
    }
}
