//! [`History`] backed by a real git repository through git2-rs.

use std::path::Path;

use git2::{Delta, DiffOptions, Oid, Repository, Tree};
use tracing::debug;

use crate::error::GitError;

use super::{ChangeAction, Commit, History, TreeChange};

/// Wrapper around `git2::Repository` implementing [`History`].
pub struct Git2History {
    repo: Repository,
}

impl Git2History {
    /// Open the repository at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    fn find_commit(&self, commit: &Commit) -> Result<git2::Commit<'_>, GitError> {
        let oid = Oid::from_str(&commit.id).map_err(|e| GitError::RevisionNotFound {
            revision: commit.id.clone(),
            source: Some(e),
        })?;
        self.repo
            .find_commit(oid)
            .map_err(|e| GitError::RevisionNotFound {
                revision: commit.id.clone(),
                source: Some(e),
            })
    }

    fn tree_of(&self, commit: &Commit) -> Result<Tree<'_>, GitError> {
        self.find_commit(commit)?
            .tree()
            .map_err(|source| GitError::TreeRead {
                commit: commit.id.clone(),
                source,
            })
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    Commit::new(commit.id().to_string(), commit.summary().unwrap_or(""))
}

fn path_string(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().replace('\\', "/"))
}

impl History for Git2History {
    fn resolve(&self, revision: &str) -> Result<Commit, GitError> {
        let not_found = |e: git2::Error| GitError::RevisionNotFound {
            revision: revision.to_string(),
            source: Some(e),
        };
        let object = self.repo.revparse_single(revision).map_err(not_found)?;
        let commit = object.peel_to_commit().map_err(not_found)?;
        Ok(to_commit(&commit))
    }

    fn parent(&self, commit: &Commit) -> Result<Commit, GitError> {
        let found = self.find_commit(commit)?;
        match found.parent_count() {
            0 => Err(GitError::NoParent {
                commit: commit.id.clone(),
            }),
            1 => {
                let parent = found.parent(0).map_err(|e| GitError::RevisionNotFound {
                    revision: format!("{}^", commit.id),
                    source: Some(e),
                })?;
                Ok(to_commit(&parent))
            }
            parents => Err(GitError::MergeCommit {
                commit: commit.id.clone(),
                parents,
            }),
        }
    }

    fn diff(&self, from: &Commit, to: &Commit, dir: &str) -> Result<Vec<TreeChange>, GitError> {
        let old_tree = self.tree_of(from)?;
        let new_tree = self.tree_of(to)?;

        let mut opts = DiffOptions::new();
        let dir = dir.trim_end_matches('/');
        if !dir.is_empty() {
            opts.pathspec(dir);
        }

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))
            .map_err(|source| GitError::Diff {
                from: from.id.clone(),
                to: to.id.clone(),
                source,
            })?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let action = match delta.status() {
                Delta::Added => ChangeAction::Added,
                Delta::Deleted => ChangeAction::Deleted,
                Delta::Modified | Delta::Renamed | Delta::Copied | Delta::Typechange => {
                    ChangeAction::Modified
                }
                _ => continue,
            };
            let old_path = match action {
                ChangeAction::Added => None,
                _ => path_string(delta.old_file().path()),
            };
            let new_path = match action {
                ChangeAction::Deleted => None,
                _ => path_string(delta.new_file().path()),
            };
            changes.push(TreeChange {
                action,
                old_path,
                new_path,
            });
        }

        debug!(
            "Diff {}..{} under '{}': {} change(s)",
            from.short_id(),
            to.short_id(),
            dir,
            changes.len()
        );

        Ok(changes)
    }

    fn read_file(&self, commit: &Commit, path: &str) -> Result<String, GitError> {
        let tree = self.tree_of(commit)?;
        let not_found = || GitError::PathNotFound {
            commit: commit.id.clone(),
            path: path.to_string(),
        };

        let entry = tree.get_path(Path::new(path)).map_err(|_| not_found())?;
        let object = entry.to_object(&self.repo).map_err(|_| not_found())?;
        let blob = object.peel_to_blob().map_err(|_| not_found())?;

        std::str::from_utf8(blob.content())
            .map(str::to_string)
            .map_err(|_| GitError::NotUtf8 {
                commit: commit.id.clone(),
                path: path.to_string(),
            })
    }
}
