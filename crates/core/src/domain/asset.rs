// Asset Domain Model

use serde::{Deserialize, Serialize};

/// A script or stylesheet the editor is about to load.
///
/// `version` is the cache-busting suffix appended to the URL (e.g. `?ver=1.24.3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFile {
    pub path: String,
    pub version: String,
}

impl AssetFile {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}
