//! Commit range resolution.

use tracing::debug;

use crate::error::GitError;

use super::{Commit, History};

/// Resolved commit range between a base and a tip.
#[derive(Debug, Clone)]
pub struct CommitRange {
    pub base: Commit,
    pub tip: Commit,
    pub base_ref: String,
    pub tip_ref: String,
    /// Commits after `base` up to and including `tip`, tip first.
    pub commits: Vec<Commit>,
}

impl CommitRange {
    /// Commits in the range, oldest first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &Commit> {
        self.commits.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Walk parents from `tip` back to `base`, excluding `base`.
///
/// The history between the two must be linear. A merge commit in the walk
/// fails with [`GitError::MergeCommit`]; reaching a root commit without
/// meeting `base` fails with [`GitError::BaseNotReachable`].
pub fn walk_range<H: History + ?Sized>(
    history: &H,
    base: &str,
    tip: &str,
) -> Result<CommitRange, GitError> {
    let base_commit = history.resolve(base)?;
    let tip_commit = history.resolve(tip)?;

    if base_commit.id == tip_commit.id {
        return Err(GitError::EmptyRange {
            revision: tip_commit.id,
        });
    }

    let mut commits = Vec::new();
    let mut current = tip_commit.clone();

    while current.id != base_commit.id {
        let parent = match history.parent(&current) {
            Ok(parent) => parent,
            Err(GitError::NoParent { .. }) => {
                return Err(GitError::BaseNotReachable {
                    base: base.to_string(),
                    tip: tip.to_string(),
                });
            }
            Err(e) => return Err(e),
        };
        commits.push(current);
        current = parent;
    }

    debug!(
        "Resolved {} commits between {} ({}) and {} ({})",
        commits.len(),
        base,
        base_commit.short_id(),
        tip,
        tip_commit.short_id()
    );

    Ok(CommitRange {
        base: base_commit,
        tip: tip_commit,
        base_ref: base.to_string(),
        tip_ref: tip.to_string(),
        commits,
    })
}
