//! Configuration handling
//!
//! Settings are layered, later layers winning key by key:
//! 1. built-in defaults
//! 2. global `config.toml` in the user config directory
//!    (overridable with `VSAVE_CONFIG_DIR`)
//! 3. `.vsave.toml` next to the project file
//! 4. command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::VersionSuffix;

/// Name of the per-directory configuration file
pub const LOCAL_CONFIG_FILE: &str = ".vsave.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// One configuration source; unset keys fall through to earlier layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub version_suffix: Option<String>,
    pub publish_suffix: Option<String>,
    pub extension: Option<String>,
    pub branch_separator: Option<String>,
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Template for the first version (e.g. `_v001`)
    pub version_suffix: String,

    /// Suffix for published copies (e.g. `_published`)
    pub publish_suffix: String,

    /// Project file extension, without the dot
    pub extension: String,

    /// Text before branch numbers (derived from the template when unset)
    pub branch_separator: Option<String>,

    /// Files that contributed to this configuration
    #[serde(skip)]
    pub sources: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version_suffix: "_v001".to_string(),
            publish_suffix: "_published".to_string(),
            extension: "blend".to_string(),
            branch_separator: None,
            sources: vec![],
        }
    }
}

impl Config {
    /// Loads configuration for files in `dir`
    ///
    /// Applies the global file, the directory file, then `overrides`.
    pub fn load_for(dir: &Path, overrides: ConfigLayer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_dir) = Self::global_config_dir() {
            config.merge_file(&global_dir.join("config.toml"))?;
        }
        config.merge_file(&Self::local_config_path(dir))?;
        config.apply(overrides);

        config.validate()?;
        Ok(config)
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("VSAVE_CONFIG_DIR") {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "vsave", "vsave").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the path of the directory-local config file
    pub fn local_config_path(dir: &Path) -> PathBuf {
        dir.join(LOCAL_CONFIG_FILE)
    }

    /// Merges a config file if it exists
    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let layer: ConfigLayer = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        self.apply(layer);
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Overrides every key the layer sets
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.version_suffix {
            self.version_suffix = v;
        }
        if let Some(v) = layer.publish_suffix {
            self.publish_suffix = v;
        }
        if let Some(v) = layer.extension {
            self.extension = v.trim_start_matches('.').to_string();
        }
        if let Some(v) = layer.branch_separator {
            self.branch_separator = Some(v);
        }
    }

    /// Checks that the settings can be used together
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.suffix()?;

        if self.publish_suffix.is_empty() {
            return Err(ConfigError::Invalid("publish_suffix must not be empty".to_string()));
        }
        if self.extension.is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".to_string()));
        }
        Ok(())
    }

    /// Builds the version suffix described by this configuration
    pub fn suffix(&self) -> Result<VersionSuffix, ConfigError> {
        let suffix = VersionSuffix::parse(&self.version_suffix)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        match &self.branch_separator {
            Some(sep) => suffix
                .with_separator(sep)
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            None => Ok(suffix),
        }
    }

    /// Writes a commented `.vsave.toml` into `dir` unless one exists
    ///
    /// Returns the path and whether the file was created.
    pub fn init_local(dir: &Path) -> Result<(PathBuf, bool)> {
        let config_path = Self::local_config_path(dir);
        if config_path.exists() {
            return Ok((config_path, false));
        }

        let defaults = Self::default();
        let content = format!(
            r#"# vsave configuration for this directory
# Keys left out fall back to the global config, then to built-in defaults.

# Template for the first version; its digit count sets the zero padding
version_suffix = "{}"

# Suffix for published copies
publish_suffix = "{}"

# Project file extension
extension = "{}"

# Text written before branch numbers (defaults to the template's punctuation)
# branch_separator = "_"
"#,
            defaults.version_suffix, defaults.publish_suffix, defaults.extension
        );

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        Ok((config_path, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.version_suffix, "_v001");
        assert_eq!(config.publish_suffix, "_published");
        assert_eq!(config.extension, "blend");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_layer() {
        let toml = r#"
version_suffix = "-r01"
extension = ".ma"
"#;

        let layer: ConfigLayer = toml::from_str(toml).unwrap();
        let mut config = Config::default();
        config.apply(layer);

        assert_eq!(config.version_suffix, "-r01");
        assert_eq!(config.extension, "ma");
        assert_eq!(config.publish_suffix, "_published");
    }

    #[test]
    fn layer_rejects_unknown_keys() {
        assert!(toml::from_str::<ConfigLayer>("suffix = \"_v1\"").is_err());
    }

    #[test]
    fn later_layer_wins() {
        let mut config = Config::default();
        config.apply(ConfigLayer {
            publish_suffix: Some("_pub".to_string()),
            ..Default::default()
        });
        config.apply(ConfigLayer {
            publish_suffix: Some("_final".to_string()),
            ..Default::default()
        });

        assert_eq!(config.publish_suffix, "_final");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.version_suffix = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.publish_suffix = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.branch_separator = Some("1".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn suffix_uses_branch_separator() {
        let mut config = Config::default();
        config.branch_separator = Some("-b".to_string());

        let suffix = config.suffix().unwrap();
        assert_eq!(suffix.separator(), "-b");
    }

    #[test]
    fn local_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            "publish_suffix = \"_final\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.merge_file(&Config::local_config_path(dir.path())).unwrap();

        assert_eq!(config.publish_suffix, "_final");
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCAL_CONFIG_FILE);
        fs::write(&path, "version_suffix = [").unwrap();

        let mut config = Config::default();
        assert!(config.merge_file(&path).is_err());
    }

    #[test]
    fn init_local_writes_loadable_file_once() {
        let dir = TempDir::new().unwrap();

        let (path, created) = Config::init_local(dir.path()).unwrap();
        assert!(created);

        let content = fs::read_to_string(&path).unwrap();
        let layer: ConfigLayer = toml::from_str(&content).unwrap();
        assert_eq!(layer.version_suffix.as_deref(), Some("_v001"));

        let (_, created) = Config::init_local(dir.path()).unwrap();
        assert!(!created);
    }
}
