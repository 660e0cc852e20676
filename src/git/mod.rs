//! Version-control access for fragment discovery.
//!
//! Traversal logic never talks to `git2` directly. It goes through the
//! [`History`] trait, which [`Git2History`] implements for real repositories
//! and which tests replace with synthetic commit graphs.

pub mod range;
pub mod repository;

pub use range::{CommitRange, walk_range};
pub use repository::Git2History;

use std::path::Path;

use crate::error::GitError;

/// A single resolved commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full hex object id.
    pub id: String,
    /// First line of the commit message.
    pub summary: String,
}

impl Commit {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
        }
    }

    /// Abbreviated id for log lines and links.
    pub fn short_id(&self) -> &str {
        let end = self.id.len().min(7);
        &self.id[..end]
    }
}

/// What happened to a path between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Modified,
    Deleted,
}

/// One changed path in a tree diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub action: ChangeAction,
    /// Path in the older tree (None for additions).
    pub old_path: Option<String>,
    /// Path in the newer tree (None for deletions).
    pub new_path: Option<String>,
}

impl TreeChange {
    pub fn added(path: impl Into<String>) -> Self {
        Self {
            action: ChangeAction::Added,
            old_path: None,
            new_path: Some(path.into()),
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            action: ChangeAction::Modified,
            old_path: Some(path.clone()),
            new_path: Some(path),
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            action: ChangeAction::Deleted,
            old_path: Some(path.into()),
            new_path: None,
        }
    }

    /// The path that exists after the change, or the removed path for deletions.
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }

    /// Final path component of [`TreeChange::path`].
    pub fn file_name(&self) -> &str {
        file_name(self.path())
    }
}

/// Final component of a slash-separated repository path.
pub fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// Capabilities the release pipeline needs from a version-control backend.
///
/// Paths are repository-relative and slash-separated.
#[cfg_attr(test, mockall::automock)]
pub trait History {
    /// Resolve a revision name (tag, branch, hash, `HEAD~2`, ...) to a commit.
    fn resolve(&self, revision: &str) -> Result<Commit, GitError>;

    /// The single parent of `commit`.
    ///
    /// Fails with [`GitError::NoParent`] for root commits and
    /// [`GitError::MergeCommit`] for commits with more than one parent.
    fn parent(&self, commit: &Commit) -> Result<Commit, GitError>;

    /// Paths under `dir` that differ between the trees of `from` and `to`.
    fn diff(&self, from: &Commit, to: &Commit, dir: &str) -> Result<Vec<TreeChange>, GitError>;

    /// Contents of `path` in the tree of `commit`.
    fn read_file(&self, commit: &Commit, path: &str) -> Result<String, GitError>;
}
