//! Sibling file scanning and lineage grouping
//!
//! Lists the files of one project (all versions, branches and published
//! copies sharing a base name) in display order. Each entry carries an
//! indentation depth equal to the length of its lineage, so branches nest
//! under the version they came from:
//!
//! ```text
//! proj.blend
//! proj_published.blend
//! proj_v001.blend
//!   proj_v001_001.blend
//!   proj_v001_002.blend
//! proj_v002.blend
//! ```

use serde::Serialize;
use tracing::debug;

use super::chain::VersionChain;
use super::listing::DirectoryListing;
use super::suffix::VersionSuffix;

/// One file in a scan result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// File name including extension
    pub name: String,
    /// Display nesting depth
    pub indent: usize,
    /// True if the name ends with the publish suffix
    pub published: bool,
    /// True if this is the file the scan was made for
    pub current: bool,
    /// Parsed version numbers
    pub chain: VersionChain,
}

/// Ordered file entries for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Project base name shared by all entries
    pub base_name: String,
    pub entries: Vec<FileEntry>,
    /// Index of the current file in `entries`, if it was listed
    pub current: Option<usize>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for the current file
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    /// Finds an entry by file name
    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Strips a trailing publish suffix, reporting whether one was present
pub fn strip_publish_suffix<'a>(stem: &'a str, publish_suffix: &str) -> (&'a str, bool) {
    if publish_suffix.is_empty() {
        return (stem, false);
    }
    match stem.strip_suffix(publish_suffix) {
        Some(rest) => (rest, true),
        None => (stem, false),
    }
}

/// Returns the project base name of a stem (publish and version suffixes removed)
pub fn project_base(stem: &str, suffix: &VersionSuffix, publish_suffix: &str) -> String {
    let (stem, _) = strip_publish_suffix(stem, publish_suffix);
    suffix.parse_name(stem).base
}

/// Lists the project files related to `current_filename`
///
/// `current_filename` may be given with or without the project extension.
pub fn scan(
    listing: &DirectoryListing,
    current_filename: &str,
    suffix: &VersionSuffix,
    publish_suffix: &str,
) -> ScanResult {
    let current_stem = listing.stem_of(current_filename).unwrap_or(current_filename);
    let base_name = project_base(current_stem, suffix, publish_suffix);

    // Snapshot iteration is already in name order, so ties below stay sorted.
    let mut entries: Vec<FileEntry> = listing
        .project_files()
        .filter_map(|(name, stem)| {
            let (unpublished, published) = strip_publish_suffix(stem, publish_suffix);
            let parsed = suffix.parse_name(unpublished);
            if parsed.base != base_name {
                return None;
            }
            Some(FileEntry {
                name: name.to_string(),
                indent: parsed.chain.depth(),
                published,
                current: stem == current_stem,
                chain: parsed.chain,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.chain.cmp(&b.chain).then(a.published.cmp(&b.published)));

    let current = entries.iter().position(|e| e.current);
    debug!(
        base = %base_name,
        scanned = listing.len(),
        matched = entries.len(),
        "scanned project files"
    );

    ScanResult {
        base_name,
        entries,
        current,
    }
}
