//! # Storage Layer
//!
//! Filesystem side of versioned saves.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Versions | copies of the project file | `{base}{suffix}.{ext}` next to the file |
//! | Published copy | copy of the project file | `{base}{publish_suffix}.{ext}` |
//! | Directory config | TOML | `.vsave.toml` next to the file |
//! | Global config | TOML | `config.toml` in the user config directory |
//!
//! ## Concurrency Safety
//!
//! - New versions are created with create-new semantics and never overwrite
//! - Published copies are written to a temp file and renamed into place
//! - The source file holds a shared lock (`fs2`) while it is copied
//!
//! Name uniqueness is checked against a directory snapshot, so another
//! process creating the same name in between is reported, not prevented.
//!
//! ## Key Types
//!
//! - [`VersionedFile`] - Entry point for versioning one project file
//! - [`Config`] - Layered configuration

mod config;
mod directory;
mod versioned_file;

pub use config::{Config, ConfigError, ConfigLayer, LOCAL_CONFIG_FILE};
pub use directory::{modified, read_listing};
pub use versioned_file::{FileError, Published, SavedVersion, VersionedFile};
