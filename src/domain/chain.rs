//! Version chains
//!
//! A version chain is the ordered list of numbers carried by a file name's
//! version suffix:
//! - `shot_v003` carries `[3]`
//! - `shot_v002_001` carries `[2, 1]` (first branch off version 2)
//! - `shot_v002_001_004` carries `[2, 1, 4]`
//!
//! Chains order numerically segment by segment, so a parent always sorts
//! directly before its branches: `[1] < [1, 1] < [1, 2] < [2]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sequence of nested version numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionChain {
    segments: Vec<u64>,
}

impl VersionChain {
    /// Creates a chain from explicit segments
    pub fn new(segments: impl Into<Vec<u64>>) -> Self {
        Self {
            segments: segments.into(),
        }
    }

    /// Creates a single-segment chain (a mainline version)
    pub fn root(version: u64) -> Self {
        Self {
            segments: vec![version],
        }
    }

    /// Returns the version numbers, outermost first
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Returns true for names that carry no version at all
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns the lineage this chain belongs to: every segment except the last
    ///
    /// Mainline versions and unversioned names share the empty lineage.
    pub fn lineage(&self) -> &[u64] {
        match self.segments.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Returns the display depth (number of segments in the lineage)
    pub fn depth(&self) -> usize {
        self.lineage().len()
    }

    /// Returns true if this chain is a branch off another version
    pub fn is_branch(&self) -> bool {
        self.segments.len() > 1
    }

    /// Returns the chain this one branched from, or None for mainline versions
    pub fn parent(&self) -> Option<VersionChain> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self::new(self.lineage()))
    }

    /// Returns the chain with its last segment advanced by one
    ///
    /// Returns None for an empty chain or when the number would overflow.
    pub fn next(&self) -> Option<VersionChain> {
        let (last, rest) = self.segments.split_last()?;
        let mut segments = rest.to_vec();
        segments.push(last.checked_add(1)?);
        Some(Self { segments })
    }

    /// Returns a new branch under this chain starting at `sequence`
    pub fn branch(&self, sequence: u64) -> VersionChain {
        let mut segments = self.segments.clone();
        segments.push(sequence);
        Self { segments }
    }
}

impl fmt::Display for VersionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", seg)?;
            first = false;
        }
        Ok(())
    }
}

impl From<Vec<u64>> for VersionChain {
    fn from(segments: Vec<u64>) -> Self {
        Self { segments }
    }
}
