//! Version suffix configuration and file-name parsing
//!
//! A suffix template such as `_v001` describes how versions are embedded in
//! file names:
//! - prefix: the leading non-digit run of the template (`_v`)
//! - width: the length of the trailing digit run (`3`, or 3 when absent)
//!
//! Branch numbers follow the first version after a branch separator, which
//! defaults to the punctuation at the start of the prefix: with `_v001` the
//! first branch off version 2 is written `_v002_001`. Names that repeat the
//! full prefix between numbers (`_v002_v001`) parse to the same chain.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use super::chain::VersionChain;

/// Zero-padding width used when a template carries no digits
pub const DEFAULT_WIDTH: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum SuffixError {
    #[error("Version suffix template is empty")]
    EmptyTemplate,

    #[error("Version suffix template must start with a non-digit prefix (e.g. '_v001'), got '{0}'")]
    MissingPrefix(String),

    #[error("Branch separator must not be empty")]
    EmptySeparator,

    #[error("Branch separator must not contain digits, got '{0}'")]
    DigitSeparator(String),

    #[error("Failed to build suffix pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result of matching a file stem against a [`VersionSuffix`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Stem with the version suffix removed
    pub base: String,
    /// Parsed version numbers (empty when the stem carries no version)
    pub chain: VersionChain,
    /// The version suffix exactly as it appeared in the stem
    pub version_text: String,
}

impl ParsedName {
    fn unversioned(stem: &str) -> Self {
        Self {
            base: stem.to_string(),
            chain: VersionChain::default(),
            version_text: String::new(),
        }
    }

    /// Returns true if the stem carried a version suffix
    pub fn is_versioned(&self) -> bool {
        !self.chain.is_empty()
    }
}

/// Parsed version suffix template
#[derive(Debug, Clone)]
pub struct VersionSuffix {
    template: String,
    prefix: String,
    width: usize,
    separator: String,
    pattern: Regex,
}

impl VersionSuffix {
    /// Parses a template such as `_v001`, deriving the branch separator
    pub fn parse(template: &str) -> Result<Self, SuffixError> {
        if template.is_empty() {
            return Err(SuffixError::EmptyTemplate);
        }

        let prefix: String = template.chars().take_while(|c| !c.is_ascii_digit()).collect();
        if prefix.is_empty() {
            return Err(SuffixError::MissingPrefix(template.to_string()));
        }

        let digits = template
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();
        let width = if digits == 0 { DEFAULT_WIDTH } else { digits };

        let separator = default_separator(&prefix);
        Ok(Self {
            pattern: build_pattern(&prefix, &separator)?,
            template: template.to_string(),
            prefix,
            width,
            separator,
        })
    }

    /// Replaces the branch separator
    pub fn with_separator(mut self, separator: &str) -> Result<Self, SuffixError> {
        if separator.is_empty() {
            return Err(SuffixError::EmptySeparator);
        }
        if separator.chars().any(|c| c.is_ascii_digit()) {
            return Err(SuffixError::DigitSeparator(separator.to_string()));
        }

        self.separator = separator.to_string();
        self.pattern = build_pattern(&self.prefix, &self.separator)?;
        Ok(self)
    }

    /// Returns the raw template this suffix was parsed from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the text written before the first version number
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the minimum number of digits per version number
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the text written before each branch number
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Renders a chain as suffix text (`[2, 1]` -> `_v002_001`)
    ///
    /// Numbers wider than the configured width are written in full.
    pub fn format(&self, chain: &VersionChain) -> String {
        let mut out = String::new();
        for (i, seg) in chain.segments().iter().enumerate() {
            out.push_str(if i == 0 { &self.prefix } else { &self.separator });
            out.push_str(&format!("{:0width$}", seg, width = self.width));
        }
        out
    }

    /// Joins a base name and a chain into a file stem
    pub fn compose(&self, base: &str, chain: &VersionChain) -> String {
        format!("{}{}", base, self.format(chain))
    }

    /// Splits a file stem into base name and version chain
    ///
    /// The version suffix is anchored at the end of the stem and takes as
    /// many repetitions as possible; everything before it is the base.
    pub fn parse_name(&self, stem: &str) -> ParsedName {
        let Some(caps) = self.pattern.captures(stem) else {
            return ParsedName::unversioned(stem);
        };
        let (Some(base), Some(version)) = (caps.get(1), caps.get(2)) else {
            return ParsedName::unversioned(stem);
        };

        let segments: Result<Vec<u64>, _> = version
            .as_str()
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(str::parse::<u64>)
            .collect();

        match segments {
            Ok(segments) => ParsedName {
                base: base.as_str().to_string(),
                chain: VersionChain::new(segments),
                version_text: version.as_str().to_string(),
            },
            Err(e) => {
                warn!(stem, error = %e, "version number out of range, treating as unversioned");
                ParsedName::unversioned(stem)
            }
        }
    }
}

impl FromStr for VersionSuffix {
    type Err = SuffixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

/// Leading punctuation of the prefix, or the whole prefix if it starts with a letter
fn default_separator(prefix: &str) -> String {
    let lead: String = prefix.chars().take_while(|c| !c.is_alphanumeric()).collect();
    if lead.is_empty() {
        prefix.to_string()
    } else {
        lead
    }
}

/// Base (lazy) followed by the longest run of versions anchored at the end
fn build_pattern(prefix: &str, separator: &str) -> Result<Regex, regex::Error> {
    let p = regex::escape(prefix);
    let s = regex::escape(separator);
    Regex::new(&format!(r"(?s)^(.*?)({p}[0-9]+(?:(?:{p}|{s})[0-9]+)*)$"))
}
