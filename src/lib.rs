//! Versioned Save - version-suffix management for project files
//!
//! Saves numbered copies of a project file (`shot_v001.blend`,
//! `shot_v002.blend`, ...), branches when the next number is already taken
//! (`shot_v001_001.blend`), publishes a stable copy (`shot_published.blend`)
//! and lists a project's files grouped by version lineage.
//!
//! The [`domain`] module holds the pure versioning algorithms; [`storage`]
//! connects them to real directories and configuration files.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    increment, scan, DirectoryListing, FileEntry, Increment, ScanResult, VersionChain,
    VersionSuffix,
};
