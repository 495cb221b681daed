//! Versioned project files on disk
//!
//! Connects the versioning algorithms to a real file: the directory is read
//! into a snapshot, and new versions and published copies are written next to
//! the file. The source is held under a shared lock while it is copied.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::{Config, ConfigLayer};
use super::directory::read_listing;
use crate::domain::{
    self, DirectoryListing, Increment, PublishPlan, ScanResult, VersionError, VersionSuffix,
};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Expected a '.{expected}' file: {path}")]
    WrongExtension { path: PathBuf, expected: String },

    #[error("File name is not valid UTF-8: {0}")]
    InvalidName(PathBuf),

    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    #[error("'{0}' is not a version of this project")]
    NotListed(String),
}

/// A new version written by [`VersionedFile::save_increment`]
#[derive(Debug, Clone, Serialize)]
pub struct SavedVersion {
    pub path: PathBuf,
    pub increment: Increment,
}

/// Files written by [`VersionedFile::publish`]
#[derive(Debug, Clone, Serialize)]
pub struct Published {
    pub published_path: PathBuf,
    pub version_path: PathBuf,
    /// True if the version file did not exist and was written
    pub version_created: bool,
    pub plan: PublishPlan,
}

/// A project file together with its effective configuration
#[derive(Debug)]
pub struct VersionedFile {
    path: PathBuf,
    dir: PathBuf,
    stem: String,
    config: Config,
    suffix: VersionSuffix,
}

impl VersionedFile {
    /// Opens a project file, loading configuration for its directory
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, ConfigLayer::default())
    }

    /// Like [`VersionedFile::open`], with settings that override the config files
    pub fn open_with(path: impl Into<PathBuf>, overrides: ConfigLayer) -> Result<Self> {
        let path = path.into();
        let config = Config::load_for(&parent_dir(&path), overrides)?;
        Self::with_config(path, config)
    }

    /// Opens a project file with an explicit configuration
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Err(FileError::NotFound(path).into());
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path).into());
        }

        config.validate()?;
        let suffix = config.suffix()?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FileError::InvalidName(path.clone()))?;

        let stem = DirectoryListing::empty(&config.extension)
            .stem_of(file_name)
            .ok_or_else(|| FileError::WrongExtension {
                path: path.clone(),
                expected: config.extension.clone(),
            })?
            .to_string();

        Ok(Self {
            dir: parent_dir(&path),
            path,
            stem,
            config,
            suffix,
        })
    }

    /// Returns the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the containing directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file name without extension
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Returns the file name with extension
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.config.extension)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the parsed version suffix
    pub fn suffix(&self) -> &VersionSuffix {
        &self.suffix
    }

    /// Returns true if this file is a published copy
    pub fn is_published(&self) -> bool {
        domain::is_published(&self.stem, &self.config.publish_suffix)
    }

    /// Reads the current directory snapshot
    pub fn listing(&self) -> Result<DirectoryListing> {
        read_listing(&self.dir, &self.config.extension)
    }

    /// Computes the next version name without writing anything
    pub fn next_version(&self) -> Result<Increment> {
        if self.is_published() {
            return Err(VersionError::AlreadyPublished(self.file_name()).into());
        }

        let listing = self.listing()?;
        Ok(domain::increment(&self.stem, &self.suffix, &listing, true)?)
    }

    /// Copies this file to the next free version name
    pub fn save_increment(&self) -> Result<SavedVersion> {
        let increment = self.next_version()?;
        let path = self.sibling(&increment.stem());

        debug!(
            from = %self.path.display(),
            to = %path.display(),
            kind = ?increment.kind,
            "saving new version"
        );
        self.copy_new(&path)?;
        info!(path = %path.display(), "saved new version");

        Ok(SavedVersion { path, increment })
    }

    /// Computes the names a publish would write
    pub fn publish_plan(&self) -> Result<PublishPlan> {
        Ok(domain::publish_plan(
            &self.stem,
            &self.suffix,
            &self.config.publish_suffix,
        )?)
    }

    /// Copies this file to the published name and makes sure its version exists
    ///
    /// The version file is written first and never overwritten; if that fails
    /// the published copy is left untouched. The published copy is then
    /// replaced atomically. Publish is not all-or-nothing: when the final
    /// replace fails, a newly written version file stays in place.
    pub fn publish(&self) -> Result<Published> {
        let plan = self.publish_plan()?;
        let published_path = self.sibling(&plan.published_stem);
        let version_path = self.sibling(&plan.version.stem());

        let version_created = if plan.version.stem() == self.stem {
            false
        } else if version_path.exists() {
            warn!(path = %version_path.display(), "version file exists, leaving it unchanged");
            false
        } else {
            self.copy_new(&version_path)?;
            true
        };

        self.copy_replace(&published_path)?;
        info!(path = %published_path.display(), "published");

        Ok(Published {
            published_path,
            version_path,
            version_created,
            plan,
        })
    }

    /// Lists this project's files grouped by lineage
    pub fn scan(&self) -> Result<ScanResult> {
        let listing = self.listing()?;
        Ok(domain::scan(
            &listing,
            &self.file_name(),
            &self.suffix,
            &self.config.publish_suffix,
        ))
    }

    /// Resolves a listed sibling name to its path
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let result = self.scan()?;
        if result.get(name).is_none() {
            return Err(FileError::NotListed(name.to_string()).into());
        }

        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(FileError::NotFound(path).into());
        }
        Ok(path)
    }

    fn sibling(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.config.extension))
    }

    fn open_source(&self) -> Result<File> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {}", self.path.display()))?;

        Ok(file)
    }

    /// Copies into a file that must not exist yet
    fn copy_new(&self, dest: &Path) -> Result<()> {
        let mut source = self.open_source()?;

        let mut target = match OpenOptions::new().write(true).create_new(true).open(dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FileError::TargetExists(dest.to_path_buf()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", dest.display()));
            }
        };

        if let Err(e) = io::copy(&mut source, &mut target).and_then(|_| target.sync_all()) {
            drop(target);
            let _ = fs::remove_file(dest);
            return Err(e).with_context(|| format!("Failed to write {}", dest.display()));
        }

        Ok(())
    }

    /// Copies through a temp file and renames over `dest`
    fn copy_replace(&self, dest: &Path) -> Result<()> {
        let file_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FileError::InvalidName(dest.to_path_buf()))?;
        let temp_path = dest.with_file_name(format!(".{}.tmp", file_name));

        {
            let mut source = self.open_source()?;
            let mut temp = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            if let Err(e) = io::copy(&mut source, &mut temp).and_then(|_| temp.sync_all()) {
                drop(temp);
                let _ = fs::remove_file(&temp_path);
                return Err(e)
                    .with_context(|| format!("Failed to write temp file: {}", temp_path.display()));
            }
        }

        fs::rename(&temp_path, dest).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                dest.display()
            )
        })
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
