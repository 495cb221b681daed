//! Directory snapshots from disk

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::trace;

use crate::domain::DirectoryListing;

/// Reads the regular files with `extension` in `dir` into a snapshot
pub fn read_listing(dir: &Path, extension: &str) -> Result<DirectoryListing> {
    let mut listing = DirectoryListing::empty(extension);

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            || entry.path().is_file();
        if !is_file {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            trace!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        if listing.stem_of(&name).is_some() {
            listing.insert(name);
        }
    }

    Ok(listing)
}

/// Returns the last modification time of a file, if available
pub fn modified(path: &Path) -> Option<DateTime<Utc>> {
    let time = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(time))
}
