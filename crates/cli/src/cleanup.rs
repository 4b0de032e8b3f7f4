//! Unlinking purged temporary files

use anyhow::{Context, Result};
use h5p_editor_core::domain::validate_upload_path;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Convert the `--max-age-hours` flag into a duration
pub fn max_age_from_hours(hours: u64) -> Result<Duration> {
    let secs = hours
        .checked_mul(3600)
        .with_context(|| format!("--max-age-hours {} is out of range", hours))?;
    Ok(Duration::from_secs(secs))
}

/// Delete purged files below `upload_dir`
///
/// Paths that could resolve outside `upload_dir` are skipped.
///
/// # Returns
/// Number of files deleted
pub async fn unlink_purged(upload_dir: &Path, paths: &[String]) -> usize {
    let mut unlinked = 0;

    for path in paths {
        if let Err(e) = validate_upload_path(path) {
            warn!(path = %path, error = %e, "Skipping temporary file outside the upload directory");
            continue;
        }

        let file = upload_dir.join(path);
        match tokio::fs::remove_file(&file).await {
            Ok(_) => {
                unlinked += 1;
                info!(path = %file.display(), "Deleted temporary file");
            }
            Err(e) => {
                // Not critical - file might already be gone
                warn!(path = %file.display(), error = %e, "Failed to delete temporary file");
            }
        }
    }

    unlinked
}
