//! Changelog fragment discovery across a commit range.
//!
//! A fragment is a small markdown file added under the fragment directory by a
//! single commit. [`collect_fragments`] finds one per commit in a range,
//! keeps only the newest version of a file edited more than once and drops
//! every fragment whose file was deleted again somewhere in that range.

pub mod deletions;
pub mod locate;

pub use deletions::find_deleted;
pub use locate::find_fragments;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{FragmentError, GitError};
use crate::git::{Commit, CommitRange, History, file_name};

/// A fragment file discovered for one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The commit that added or modified the file.
    pub commit: Commit,
    /// Repository-relative path of the file.
    pub path: String,
    pub lines: Vec<String>,
}

impl Fragment {
    /// Base file name, used to match deletions.
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }
}

/// Find the surviving fragments for every commit in `range`.
///
/// Commits without a fragment are logged and skipped. A path touched by several
/// commits appears once, as read at the tip-most of them. The result keeps the
/// range order (tip first).
pub fn collect_fragments<H: History + ?Sized>(
    history: &H,
    dir: &str,
    range: &CommitRange,
) -> Result<Vec<Fragment>, GitError> {
    let mut fragments = Vec::new();

    for commit in &range.commits {
        let parent = history.parent(commit)?;
        match find_fragments(history, dir, &parent, commit) {
            Ok(found) => fragments.extend(found),
            Err(FragmentError::NoFragment { commit }) => {
                info!("No changelog fragment found for commit {}", commit);
            }
            Err(FragmentError::Git(e)) => return Err(e),
        }
    }

    let mut seen = HashSet::new();
    fragments.retain(|fragment| {
        let newest = seen.insert(fragment.path.clone());
        if !newest {
            debug!(
                "Skipping older version of {} from {}",
                fragment.path,
                fragment.commit.short_id()
            );
        }
        newest
    });

    let deleted = find_deleted(history, dir, range)?;
    fragments.retain(|fragment| {
        let keep = !deleted.contains(fragment.file_name());
        if !keep {
            info!(
                "Dropping fragment {} from {}: deleted later in range",
                fragment.path,
                fragment.commit.short_id()
            );
        }
        keep
    });

    Ok(fragments)
}
