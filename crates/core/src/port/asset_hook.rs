// Asset Alteration Hook Port
use crate::domain::{AssetFile, LibraryRef};

/// Channel name passed to the hook when the editor loads its assets
pub const EDITOR_CHANNEL: &str = "editor";

/// Host extension point deciding which scripts and styles get attached
///
/// Lets other plugins add, drop or reorder assets to change the look and
/// behaviour of content types.
pub trait AssetAlterHook: Send + Sync {
    /// Alter `files` in place
    ///
    /// # Arguments
    /// * `files` - Assets about to be loaded, as (path, version) pairs
    /// * `libraries` - Libraries the assets belong to
    /// * `channel` - Where the assets are used (e.g. [`EDITOR_CHANNEL`])
    fn alter_assets(&self, files: &mut Vec<AssetFile>, libraries: &[LibraryRef], channel: &str);
}

/// Hook that leaves the asset list untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAssetHook;

impl AssetAlterHook for NoopAssetHook {
    fn alter_assets(&self, _files: &mut Vec<AssetFile>, _libraries: &[LibraryRef], _channel: &str) {}
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Arguments of one `alter_assets` call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub files: Vec<AssetFile>,
        pub libraries: Vec<LibraryRef>,
        pub channel: String,
    }

    type Mutation = Box<dyn Fn(&mut Vec<AssetFile>) + Send + Sync>;

    /// Records every call, then applies an optional mutation to the file list
    pub struct RecordingAssetHook {
        calls: Mutex<Vec<RecordedCall>>,
        mutation: Option<Mutation>,
    }

    impl RecordingAssetHook {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                mutation: None,
            }
        }

        pub fn with_mutation(mutation: impl Fn(&mut Vec<AssetFile>) + Send + Sync + 'static) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                mutation: Some(Box::new(mutation)),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for RecordingAssetHook {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AssetAlterHook for RecordingAssetHook {
        fn alter_assets(&self, files: &mut Vec<AssetFile>, libraries: &[LibraryRef], channel: &str) {
            self.calls.lock().unwrap().push(RecordedCall {
                files: files.clone(),
                libraries: libraries.to_vec(),
                channel: channel.to_string(),
            });
            if let Some(mutation) = &self.mutation {
                mutation(files);
            }
        }
    }
}
