//! Scan a commit range for fragment files that were removed.

use std::collections::HashSet;

use tracing::debug;

use crate::error::GitError;
use crate::git::{ChangeAction, CommitRange, History};

/// Base file names of every file under `dir` deleted by any commit in `range`.
///
/// Commits are visited oldest first.
pub fn find_deleted<H: History + ?Sized>(
    history: &H,
    dir: &str,
    range: &CommitRange,
) -> Result<HashSet<String>, GitError> {
    let mut deleted = HashSet::new();

    for commit in range.oldest_first() {
        let parent = history.parent(commit)?;
        for change in history.diff(&parent, commit, dir)? {
            if change.action == ChangeAction::Deleted {
                debug!("Commit {} deletes {}", commit.short_id(), change.path());
                deleted.insert(change.file_name().to_string());
            }
        }
    }

    Ok(deleted)
}
