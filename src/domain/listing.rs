//! Directory snapshots
//!
//! Both the incrementer and the scanner work against a read-only snapshot of
//! file names instead of touching the filesystem. The snapshot knows the
//! project file extension so callers can reason in stems.

use std::collections::BTreeSet;

/// Read-only set of file names from one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    extension: String,
    names: BTreeSet<String>,
}

impl DirectoryListing {
    /// Creates a snapshot for files with `extension` (with or without the dot)
    pub fn new<I, S>(extension: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an empty snapshot
    pub fn empty(extension: &str) -> Self {
        Self::new(extension, std::iter::empty::<String>())
    }

    /// Returns the project file extension, without the dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if a file with this exact name was present
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns true if a project file with this stem was present
    pub fn contains_stem(&self, stem: &str) -> bool {
        self.names.contains(&self.file_name(stem))
    }

    /// Appends the project extension to a stem
    pub fn file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, self.extension)
        }
    }

    /// Strips the project extension, or None if the name has a different one
    pub fn stem_of<'a>(&self, name: &'a str) -> Option<&'a str> {
        if self.extension.is_empty() {
            return Some(name);
        }
        name.strip_suffix(self.extension.as_str())?.strip_suffix('.')
    }

    /// Iterates over `(name, stem)` for every project file, in name order
    pub fn project_files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .filter_map(move |name| self.stem_of(name).map(|stem| (name.as_str(), stem)))
    }

    /// Records a name created after the snapshot was taken
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dot_is_optional() {
        let a = DirectoryListing::new(".blend", ["a.blend"]);
        let b = DirectoryListing::new("blend", ["a.blend"]);

        assert_eq!(a, b);
        assert_eq!(a.extension(), "blend");
    }

    #[test]
    fn contains_stem_uses_extension() {
        let listing = DirectoryListing::new("blend", ["shot_v001.blend", "notes.txt"]);

        assert!(listing.contains_stem("shot_v001"));
        assert!(!listing.contains_stem("notes"));
        assert!(listing.contains("notes.txt"));
    }

    #[test]
    fn stem_of_requires_matching_extension() {
        let listing = DirectoryListing::empty("blend");

        assert_eq!(listing.stem_of("shot.blend"), Some("shot"));
        assert_eq!(listing.stem_of("shot.blend1"), None);
        assert_eq!(listing.stem_of("shotblend"), None);
        assert_eq!(listing.stem_of("shot.txt"), None);
    }

    #[test]
    fn project_files_skips_other_extensions() {
        let listing = DirectoryListing::new("blend", ["b.blend", "a.blend", "c.blend1"]);
        let files: Vec<_> = listing.project_files().collect();

        assert_eq!(files, vec![("a.blend", "a"), ("b.blend", "b")]);
    }

    #[test]
    fn insert_records_new_name() {
        let mut listing = DirectoryListing::empty("blend");

        assert!(listing.insert("shot.blend"));
        assert!(!listing.insert("shot.blend"));
        assert_eq!(listing.len(), 1);
    }
}
