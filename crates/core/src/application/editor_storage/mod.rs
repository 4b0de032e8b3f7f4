// Editor Storage Service - libraries, translations and file retention for the editor

mod catalog;

pub use catalog::build_catalog;

use crate::domain::{validate_upload_path, AssetFile, EditorLibrary, LibraryRef};
use crate::error::Result;
use crate::port::{
    AssetAlterHook, CapabilityChecker, LibraryRepository, TimeProvider, TmpFileRepository,
    EDITOR_CHANNEL,
};
use std::sync::Arc;
use tracing::debug;

/// Library & translation store used by the content editor
///
/// Every collaborator is injected. Each operation is a single repository call
/// (or none, for asset alteration).
pub struct EditorStorage {
    libraries: Arc<dyn LibraryRepository>,
    tmp_files: Arc<dyn TmpFileRepository>,
    capability: Arc<dyn CapabilityChecker>,
    asset_hook: Arc<dyn AssetAlterHook>,
    time_provider: Arc<dyn TimeProvider>,
}

impl EditorStorage {
    pub fn new(
        libraries: Arc<dyn LibraryRepository>,
        tmp_files: Arc<dyn TmpFileRepository>,
        capability: Arc<dyn CapabilityChecker>,
        asset_hook: Arc<dyn AssetAlterHook>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            libraries,
            tmp_files,
            capability,
            asset_hook,
            time_provider,
        }
    }

    /// Load the translation (JSON) of a library's editor fields
    ///
    /// Exact match only: there is no fallback to another language.
    pub async fn get_translation(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
        language_code: &str,
    ) -> Result<Option<String>> {
        debug!(
            library = name,
            major_version, minor_version, language_code, "Loading translation"
        );
        self.libraries
            .find_translation(name, major_version, minor_version, language_code)
            .await
    }

    /// Language codes a library has translations for
    pub async fn available_languages(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
    ) -> Result<Vec<String>> {
        self.libraries
            .list_translation_languages(name, major_version, minor_version)
            .await
    }

    /// Mark an uploaded file as permanent (used when content referencing it is saved)
    ///
    /// A file that is not in the temporary list is ignored.
    pub async fn mark_file_permanent(&self, path: &str) -> Result<()> {
        let removed = self.tmp_files.delete_by_path(path).await?;
        debug!(path, removed, "Marked file permanent");
        Ok(())
    }

    /// Put an uploaded file on the temporary list until content claims it
    ///
    /// `path` must be relative to the upload directory; anything that could
    /// resolve outside it is rejected with [`DomainError::UnsafeUploadPath`].
    ///
    /// [`DomainError::UnsafeUploadPath`]: crate::domain::DomainError::UnsafeUploadPath
    pub async fn mark_file_for_cleanup(&self, path: &str) -> Result<()> {
        validate_upload_path(path)?;
        let now = self.time_provider.now_secs();
        self.tmp_files.insert(path, now).await?;
        debug!(path, created_at = now, "Marked file for cleanup");
        Ok(())
    }

    /// Decide which content types the editor offers
    ///
    /// * `Some(requested)` - load details for exactly these libraries, in request order;
    ///   libraries that don't exist (or have no semantics) are dropped.
    /// * `None` - every runnable library, with all but the newest version of each
    ///   name flagged `is_old`.
    pub async fn list_libraries(
        &self,
        requested: Option<Vec<LibraryRef>>,
    ) -> Result<Vec<EditorLibrary>> {
        let privileged = self.capability.can_manage_libraries();

        let Some(requested) = requested else {
            let rows = self.libraries.list_runnable_libraries().await?;
            let catalog = build_catalog(rows, privileged);
            debug!(count = catalog.len(), privileged, "Listed library catalog");
            return Ok(catalog);
        };

        let mut found = Vec::with_capacity(requested.len());
        for library in requested {
            match self.libraries.find_editor_library(&library).await? {
                Some(details) => {
                    found.push(EditorLibrary::from_request(library, details, privileged))
                }
                None => debug!(library = %library, "Requested library not available"),
            }
        }
        Ok(found)
    }

    /// Let the host alter which scripts and styles the editor attaches
    pub fn alter_library_files(&self, files: &mut Vec<AssetFile>, libraries: &[LibraryRef]) {
        self.asset_hook
            .alter_assets(files, libraries, EDITOR_CHANNEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::error::AppError;
    use crate::port::asset_hook::mocks::RecordingAssetHook;
    use crate::port::capability::mocks::CountingCapability;
    use crate::port::library_repository::mocks::{InMemoryLibraryRepository, MockLibrary};
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::tmp_file_repository::mocks::InMemoryTmpFileRepository;
    use crate::port::NoopAssetHook;

    struct Fixture {
        libraries: Arc<InMemoryLibraryRepository>,
        tmp_files: Arc<InMemoryTmpFileRepository>,
        capability: Arc<CountingCapability>,
        storage: EditorStorage,
    }

    fn fixture(privileged: bool) -> Fixture {
        let libraries = Arc::new(InMemoryLibraryRepository::new());
        let tmp_files = Arc::new(InMemoryTmpFileRepository::new());
        let capability = Arc::new(CountingCapability::new(privileged));
        let storage = EditorStorage::new(
            libraries.clone(),
            tmp_files.clone(),
            capability.clone(),
            Arc::new(NoopAssetHook),
            Arc::new(FixedTimeProvider(1_700_000_000)),
        );
        Fixture {
            libraries,
            tmp_files,
            capability,
            storage,
        }
    }

    #[tokio::test]
    async fn test_translation_exact_match_only() {
        let f = fixture(false);
        f.libraries
            .add_translation("H5P.Blanks", 1, 14, "nb", r#"{"semantics":[]}"#);

        let hit = f
            .storage
            .get_translation("H5P.Blanks", 1, 14, "nb")
            .await
            .unwrap();
        assert_eq!(hit.as_deref(), Some(r#"{"semantics":[]}"#));

        let other_lang = f
            .storage
            .get_translation("H5P.Blanks", 1, 14, "en")
            .await
            .unwrap();
        assert!(other_lang.is_none());

        let other_version = f
            .storage
            .get_translation("H5P.Blanks", 1, 13, "nb")
            .await
            .unwrap();
        assert!(other_version.is_none());
    }

    #[tokio::test]
    async fn test_mark_file_permanent_is_idempotent() {
        let f = fixture(false);
        f.storage.mark_file_for_cleanup("images/a.png").await.unwrap();
        f.storage.mark_file_for_cleanup("images/b.png").await.unwrap();

        f.storage.mark_file_permanent("images/a.png").await.unwrap();
        f.storage.mark_file_permanent("images/a.png").await.unwrap();
        f.storage.mark_file_permanent("never/listed.png").await.unwrap();

        assert_eq!(f.tmp_files.paths(), vec!["images/b.png".to_string()]);
    }

    #[tokio::test]
    async fn test_mark_file_for_cleanup_rejects_escaping_paths() {
        let f = fixture(false);

        for path in ["/etc/passwd", "../../home/u/.bashrc"] {
            let err = f.storage.mark_file_for_cleanup(path).await.unwrap_err();
            assert!(matches!(
                err,
                AppError::Domain(DomainError::UnsafeUploadPath(ref p)) if p == path
            ));
        }

        assert!(f.tmp_files.paths().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_checks_capability_once() {
        let f = fixture(false);
        for minor in 0..5 {
            f.libraries
                .add_library(MockLibrary::runnable("H5P.Blanks", "Blanks", 1, minor));
        }

        let catalog = f.storage.list_libraries(None).await.unwrap();

        assert_eq!(catalog.len(), 5);
        assert_eq!(f.capability.calls(), 1);
        assert_eq!(f.libraries.queries(), 1);
        assert_eq!(catalog.iter().filter(|l| !l.is_old).count(), 1);
    }

    #[tokio::test]
    async fn test_catalog_excludes_non_runnable_and_semantics_less() {
        let f = fixture(false);
        f.libraries
            .add_library(MockLibrary::runnable("H5P.Blanks", "Blanks", 1, 0));
        f.libraries
            .add_library(MockLibrary::runnable("H5P.Question", "Question", 1, 0).not_runnable());
        f.libraries
            .add_library(MockLibrary::runnable("H5P.Draft", "Draft", 1, 0).without_semantics());

        let catalog = f.storage.list_libraries(None).await.unwrap();

        let names: Vec<_> = catalog.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["H5P.Blanks"]);
    }

    #[tokio::test]
    async fn test_filtered_preserves_order_and_omits_missing() {
        let f = fixture(false);
        f.libraries.add_library(
            MockLibrary::runnable("H5P.Blanks", "Blanks", 1, 14).tutorial("https://h5p.org/blanks"),
        );
        f.libraries
            .add_library(MockLibrary::runnable("H5P.Question", "Question", 1, 5).not_runnable());

        let requested = vec![
            LibraryRef::new("H5P.Question", 1, 5),
            LibraryRef::new("H5P.Missing", 1, 0),
            LibraryRef::new("H5P.Blanks", 1, 14),
        ];
        let found = f.storage.list_libraries(Some(requested)).await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "H5P.Question");
        assert!(!found[0].runnable);
        assert_eq!(found[1].name, "H5P.Blanks");
        assert_eq!(found[1].title, "Blanks");
        assert_eq!(found[1].tutorial_url.as_deref(), Some("https://h5p.org/blanks"));
        assert!(found.iter().all(|l| !l.is_old));
        assert_eq!(f.capability.calls(), 1);
    }

    #[tokio::test]
    async fn test_filtered_empty_request_is_empty() {
        let f = fixture(false);
        f.libraries
            .add_library(MockLibrary::runnable("H5P.Blanks", "Blanks", 1, 14));

        let found = f.storage.list_libraries(Some(Vec::new())).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_restricted_flag_follows_privilege() {
        for privileged in [false, true] {
            let f = fixture(privileged);
            f.libraries
                .add_library(MockLibrary::runnable("H5P.Secret", "Secret", 1, 0).restricted());
            f.libraries
                .add_library(MockLibrary::runnable("H5P.Open", "Open", 1, 0));

            let catalog = f.storage.list_libraries(None).await.unwrap();
            let secret = catalog.iter().find(|l| l.name == "H5P.Secret").unwrap();
            let open = catalog.iter().find(|l| l.name == "H5P.Open").unwrap();
            assert_eq!(secret.restricted, !privileged);
            assert!(!open.restricted);

            let found = f
                .storage
                .list_libraries(Some(vec![LibraryRef::new("H5P.Secret", 1, 0)]))
                .await
                .unwrap();
            assert_eq!(found[0].restricted, !privileged);
        }
    }

    #[test]
    fn test_alter_library_files_delegates_to_hook() {
        let hook = Arc::new(RecordingAssetHook::with_mutation(|files| {
            files.retain(|f| !f.path.ends_with(".css"));
            files.push(AssetFile::new("custom/editor.js", "?ver=1"));
        }));
        let storage = EditorStorage::new(
            Arc::new(InMemoryLibraryRepository::new()),
            Arc::new(InMemoryTmpFileRepository::new()),
            Arc::new(CountingCapability::new(false)),
            hook.clone(),
            Arc::new(FixedTimeProvider(0)),
        );

        let original = vec![
            AssetFile::new("libraries/H5P.Blanks-1.14/blanks.js", "?ver=1.14.2"),
            AssetFile::new("libraries/H5P.Blanks-1.14/blanks.css", "?ver=1.14.2"),
        ];
        let libraries = vec![LibraryRef::new("H5P.Blanks", 1, 14)];
        let mut files = original.clone();

        storage.alter_library_files(&mut files, &libraries);

        let calls = hook.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].files, original);
        assert_eq!(calls[0].libraries, libraries);
        assert_eq!(calls[0].channel, "editor");

        assert_eq!(
            files,
            vec![
                AssetFile::new("libraries/H5P.Blanks-1.14/blanks.js", "?ver=1.14.2"),
                AssetFile::new("custom/editor.js", "?ver=1"),
            ]
        );
    }
}
