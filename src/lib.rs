//! unclog - assemble a release changelog from per-commit fragment files.
//!
//! # Overview
//!
//! Each change adds a small markdown fragment under a fragment directory
//! (`changelog/` by default). At release time unclog walks the commits between
//! the previous release and the new tag, finds the fragment each commit added,
//! drops fragments that were deleted again within the range, sorts their
//! bullets into sections and writes them above the previous changelog.

pub mod changelog;
pub mod check;
pub mod config;
pub mod error;
pub mod fragment;
pub mod git;
pub mod release;

// Re-export commonly used types
pub use changelog::{PreviousChangelog, SectionMap};
pub use config::{ReleaseConfig, RepoConfig, SectionConfig};
pub use error::{ChangelogError, CheckError, ConfigError, FragmentError, GitError, ReleaseError};
pub use fragment::Fragment;
pub use git::{Commit, Git2History, History};
