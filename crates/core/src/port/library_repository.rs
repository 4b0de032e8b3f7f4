// Library Repository Port (Interface)

use crate::domain::{LibraryDetails, LibraryRef, StoredLibrary};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to libraries and their translations
///
/// Implementations must bind every value as a query parameter.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Find the translation JSON for an exact (name, major, minor, language) match
    async fn find_translation(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
        language_code: &str,
    ) -> Result<Option<String>>;

    /// List language codes with a stored translation, sorted ascending
    async fn list_translation_languages(
        &self,
        name: &str,
        major_version: u32,
        minor_version: u32,
    ) -> Result<Vec<String>>;

    /// Find an editor-usable library (semantics defined), runnable or not
    async fn find_editor_library(&self, library: &LibraryRef) -> Result<Option<LibraryDetails>>;

    /// List runnable libraries with semantics defined, ordered by title
    async fn list_runnable_libraries(&self) -> Result<Vec<StoredLibrary>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// One library row as the in-memory repository sees it
    #[derive(Debug, Clone)]
    pub struct MockLibrary {
        pub library: StoredLibrary,
        pub runnable: bool,
        pub has_semantics: bool,
    }

    impl MockLibrary {
        /// Runnable library with semantics
        pub fn runnable(name: &str, title: &str, major: u32, minor: u32) -> Self {
            Self {
                library: StoredLibrary {
                    name: name.to_string(),
                    title: title.to_string(),
                    major_version: major,
                    minor_version: minor,
                    tutorial_url: None,
                    restricted: false,
                },
                runnable: true,
                has_semantics: true,
            }
        }

        pub fn restricted(mut self) -> Self {
            self.library.restricted = true;
            self
        }

        pub fn not_runnable(mut self) -> Self {
            self.runnable = false;
            self
        }

        pub fn without_semantics(mut self) -> Self {
            self.has_semantics = false;
            self
        }

        pub fn tutorial(mut self, url: &str) -> Self {
            self.library.tutorial_url = Some(url.to_string());
            self
        }

        fn matches(&self, name: &str, major: u32, minor: u32) -> bool {
            self.library.name == name
                && self.library.major_version == major
                && self.library.minor_version == minor
        }
    }

    /// In-memory repository with a query counter
    #[derive(Default)]
    pub struct InMemoryLibraryRepository {
        libraries: Mutex<Vec<MockLibrary>>,
        // (name, major, minor, language) -> translation
        translations: Mutex<HashMap<(String, u32, u32, String), String>>,
        queries: AtomicUsize,
    }

    impl InMemoryLibraryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_library(&self, library: MockLibrary) {
            self.libraries.lock().unwrap().push(library);
        }

        pub fn add_translation(&self, name: &str, major: u32, minor: u32, lang: &str, json: &str) {
            self.translations.lock().unwrap().insert(
                (name.to_string(), major, minor, lang.to_string()),
                json.to_string(),
            );
        }

        /// Number of repository calls made so far
        pub fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        fn count_query(&self) {
            self.queries.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl LibraryRepository for InMemoryLibraryRepository {
        async fn find_translation(
            &self,
            name: &str,
            major_version: u32,
            minor_version: u32,
            language_code: &str,
        ) -> Result<Option<String>> {
            self.count_query();
            let key = (
                name.to_string(),
                major_version,
                minor_version,
                language_code.to_string(),
            );
            Ok(self.translations.lock().unwrap().get(&key).cloned())
        }

        async fn list_translation_languages(
            &self,
            name: &str,
            major_version: u32,
            minor_version: u32,
        ) -> Result<Vec<String>> {
            self.count_query();
            let mut languages: Vec<String> = self
                .translations
                .lock()
                .unwrap()
                .keys()
                .filter(|(n, major, minor, _)| {
                    n == name && *major == major_version && *minor == minor_version
                })
                .map(|(_, _, _, lang)| lang.clone())
                .collect();
            languages.sort();
            Ok(languages)
        }

        async fn find_editor_library(
            &self,
            library: &LibraryRef,
        ) -> Result<Option<LibraryDetails>> {
            self.count_query();
            let libraries = self.libraries.lock().unwrap();
            Ok(libraries
                .iter()
                .find(|l| {
                    l.has_semantics
                        && l.matches(&library.name, library.major_version, library.minor_version)
                })
                .map(|l| LibraryDetails {
                    title: l.library.title.clone(),
                    runnable: l.runnable,
                    restricted: l.library.restricted,
                    tutorial_url: l.library.tutorial_url.clone(),
                }))
        }

        async fn list_runnable_libraries(&self) -> Result<Vec<StoredLibrary>> {
            self.count_query();
            let mut rows: Vec<StoredLibrary> = self
                .libraries
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.runnable && l.has_semantics)
                .map(|l| l.library.clone())
                .collect();
            rows.sort_by(|a, b| a.title.cmp(&b.title));
            Ok(rows)
        }
    }
}
