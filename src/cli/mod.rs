//! # Command-Line Interface
//!
//! User-facing commands wrapping [`crate::storage::VersionedFile`].
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `next` | Print the next version name |
//! | `increment` | Save a copy as the next version |
//! | `publish` | Save a copy under the publish name |
//! | `list` | Show versions grouped by lineage |
//! | `resolve` | Print the path of a listed file |
//! | `open-dir` | Open the containing directory |
//! | `config show`, `config init` | Configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. Use `--verbose` (or `-v`) for
//! debug output, or set `VSAVE_LOG` to a filter:
//! ```bash
//! VSAVE_LOG=trace vsave increment shot_v003.blend
//! ```

mod app;
mod output;
mod logging;
mod version_cmd;
mod list_cmd;
mod config_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
