//! Version incrementing and branching
//!
//! Given a file stem and a directory snapshot, computes the next version name:
//!
//! | Current | Present in directory | Result |
//! |---------|----------------------|--------|
//! | `shot` | - | `shot_v001` (first version) |
//! | `shot_v001` | - | `shot_v002` |
//! | `shot_v001` | `shot_v002` | `shot_v001_001` (branch) |
//! | `shot_v001` | `shot_v002`, `shot_v001_001` | `shot_v001_002` |
//! | `shot` (template `-rev`) | `shot-rev` | `shot-rev-001` |
//!
//! A branch starts whenever advancing the last number would land on a file
//! that already exists. The branch number then climbs until a free name is
//! found, giving up after [`MAX_BRANCH_ATTEMPTS`].

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use super::chain::VersionChain;
use super::listing::DirectoryListing;
use super::suffix::VersionSuffix;

/// Upper bound on branch numbers tried before giving up
pub const MAX_BRANCH_ATTEMPTS: u64 = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("No free branch name for '{base}' after {attempts} attempts")]
    Exhausted { base: String, attempts: u64 },

    #[error("Version number overflow in '{0}'")]
    Overflow(String),

    #[error("'{0}' is a published file and cannot be versioned")]
    AlreadyPublished(String),

    #[error("Publish suffix must not be empty")]
    EmptyPublishSuffix,
}

/// How an [`Increment`] was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementKind {
    /// The stem had no version; the template was applied
    First,
    /// The last version number was advanced
    Advanced,
    /// Advancing collided, so a branch was started
    Branched,
    /// The existing version was kept (publish)
    Unchanged,
}

/// Outcome of [`increment`]: the parts of the new file stem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Increment {
    pub base_name: String,
    pub suffix_text: String,
    pub chain: VersionChain,
    pub kind: IncrementKind,
}

impl Increment {
    /// Returns the full stem (`base_name` + `suffix_text`)
    pub fn stem(&self) -> String {
        format!("{}{}", self.base_name, self.suffix_text)
    }
}

/// Computes the next version for `stem`
///
/// With `advance = false` the current version is returned verbatim, which is
/// what publishing needs. Unversioned stems get the raw template unless that
/// name is already taken, in which case the search continues from it.
pub fn increment(
    stem: &str,
    suffix: &VersionSuffix,
    listing: &DirectoryListing,
    advance: bool,
) -> Result<Increment, VersionError> {
    let parsed = suffix.parse_name(stem);

    if !parsed.is_versioned() {
        let first = Increment {
            base_name: stem.to_string(),
            suffix_text: suffix.template().to_string(),
            chain: suffix.parse_name(suffix.template()).chain,
            kind: IncrementKind::First,
        };

        if !advance || !listing.contains_stem(&first.stem()) {
            return Ok(first);
        }

        debug!(stem, taken = %first.stem(), "first version name is taken");
        if first.chain.is_empty() {
            return next_free_raw(stem, suffix, listing);
        }
        let (chain, kind) = next_free(stem, &first.chain, suffix, listing)?;
        return Ok(Increment {
            suffix_text: suffix.format(&chain),
            base_name: first.base_name,
            chain,
            kind,
        });
    }

    if !advance {
        return Ok(Increment {
            base_name: parsed.base,
            suffix_text: parsed.version_text,
            chain: parsed.chain,
            kind: IncrementKind::Unchanged,
        });
    }

    let (chain, kind) = next_free(&parsed.base, &parsed.chain, suffix, listing)?;
    Ok(Increment {
        suffix_text: suffix.format(&chain),
        base_name: parsed.base,
        chain,
        kind,
    })
}

fn next_free(
    base: &str,
    current: &VersionChain,
    suffix: &VersionSuffix,
    listing: &DirectoryListing,
) -> Result<(VersionChain, IncrementKind), VersionError> {
    let overflow = || VersionError::Overflow(suffix.compose(base, current));

    let candidate = current.next().ok_or_else(overflow)?;
    if !listing.contains_stem(&suffix.compose(base, &candidate)) {
        return Ok((candidate, IncrementKind::Advanced));
    }

    debug!(base, version = %current, "next version exists, branching");
    let mut branch = current.branch(1);
    for _ in 0..MAX_BRANCH_ATTEMPTS {
        let stem = suffix.compose(base, &branch);
        if !listing.contains_stem(&stem) {
            return Ok((branch, IncrementKind::Branched));
        }
        trace!(stem, "branch name taken");
        branch = branch.next().ok_or_else(overflow)?;
    }

    Err(VersionError::Exhausted {
        base: base.to_string(),
        attempts: MAX_BRANCH_ATTEMPTS,
    })
}

/// Branches off a taken template that carries no version number
///
/// `-rev` becomes `-rev-001`, `-rev-002`, ... and the branch number is
/// reported as a single-element chain.
fn next_free_raw(
    base: &str,
    suffix: &VersionSuffix,
    listing: &DirectoryListing,
) -> Result<Increment, VersionError> {
    for n in 1..=MAX_BRANCH_ATTEMPTS {
        let suffix_text = format!(
            "{}{}{:0width$}",
            suffix.template(),
            suffix.separator(),
            n,
            width = suffix.width()
        );
        if !listing.contains_stem(&format!("{}{}", base, suffix_text)) {
            return Ok(Increment {
                base_name: base.to_string(),
                suffix_text,
                chain: VersionChain::root(n),
                kind: IncrementKind::Branched,
            });
        }
        trace!(base, suffix = %suffix_text, "branch name taken");
    }

    Err(VersionError::Exhausted {
        base: base.to_string(),
        attempts: MAX_BRANCH_ATTEMPTS,
    })
}

/// Returns true if the stem contains the publish suffix
pub fn is_published(stem: &str, publish_suffix: &str) -> bool {
    !publish_suffix.is_empty() && stem.contains(publish_suffix)
}

/// File stems written by a publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishPlan {
    /// Stem of the published copy (`{base}{publish_suffix}`)
    pub published_stem: String,
    /// The version the published copy was taken from
    pub version: Increment,
}

/// Works out the names a publish of `stem` writes
///
/// The version is never advanced. Stems that already carry the publish
/// suffix are refused.
pub fn publish_plan(
    stem: &str,
    suffix: &VersionSuffix,
    publish_suffix: &str,
) -> Result<PublishPlan, VersionError> {
    if publish_suffix.is_empty() {
        return Err(VersionError::EmptyPublishSuffix);
    }
    if is_published(stem, publish_suffix) {
        return Err(VersionError::AlreadyPublished(stem.to_string()));
    }

    let version = increment(stem, suffix, &DirectoryListing::default(), false)?;
    Ok(PublishPlan {
        published_stem: format!("{}{}", version.base_name, publish_suffix),
        version,
    })
}
