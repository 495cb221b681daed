//! Domain logic for versioned saves
//!
//! Pure functions over file names and directory snapshots, without any I/O.

mod chain;
mod suffix;
mod listing;
mod increment;
mod scan;

pub use chain::VersionChain;
pub use suffix::{ParsedName, SuffixError, VersionSuffix, DEFAULT_WIDTH};
pub use listing::DirectoryListing;
pub use increment::{
    increment, is_published, publish_plan, Increment, IncrementKind, PublishPlan, VersionError,
    MAX_BRANCH_ATTEMPTS,
};
pub use scan::{project_base, scan, strip_publish_suffix, FileEntry, ScanResult};
