//! Error types for unclog modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the version-control layer and range walking.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Revision '{revision}' not found")]
    RevisionNotFound {
        revision: String,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("No commits to process: tip and base both resolve to {revision}")]
    EmptyRange { revision: String },

    #[error("Commit {commit} has no parent")]
    NoParent { commit: String },

    #[error("Commit {commit} is a merge commit with {parents} parents; a linear history is required")]
    MergeCommit { commit: String, parents: usize },

    #[error("Base {base} is not reachable from {tip} by following parents")]
    BaseNotReachable { base: String, tip: String },

    #[error("Failed to read tree of commit {commit}: {source}")]
    TreeRead {
        commit: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to diff {from}..{to}: {source}")]
    Diff {
        from: String,
        to: String,
        #[source]
        source: git2::Error,
    },

    #[error("Path {path} not found in commit {commit}")]
    PathNotFound { commit: String, path: String },

    #[error("File {path} in commit {commit} is not valid UTF-8")]
    NotUtf8 { commit: String, path: String },
}

/// Errors from fragment discovery.
#[derive(Error, Debug)]
pub enum FragmentError {
    /// Recoverable during a release: the commit simply did not add a fragment.
    #[error("No changelog fragment found for commit {commit}")]
    NoFragment { commit: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors from changelog parsing, validation and writing.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove fragment {}: {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No version heading found in previous changelog {}", path.display())]
    PreviousVersionNotFound { path: PathBuf },

    #[error(
        "invalid changelog section(s) found: {}.\nMust be one of: {}",
        invalid.join(", "),
        allowed.join(", ")
    )]
    InvalidSection {
        invalid: Vec<String>,
        allowed: Vec<String>,
    },

    #[error("Fragment {path} contains no sections")]
    NoSections { path: String },
}

/// Errors from loading `.unclog.yaml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors from the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the pre-merge check.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("No fragments listed in environment variable {0}")]
    EmptyFragmentList(String),

    #[error("Could not find changelog fragment in branch: {0}")]
    MissingFragment(#[source] FragmentError),

    #[error("Fragment {path} is invalid: {source}")]
    InvalidFragment {
        path: String,
        #[source]
        source: ChangelogError,
    },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_section_message_lists_names() {
        let err = ChangelogError::InvalidSection {
            invalid: vec!["Removed".to_string()],
            allowed: vec!["Added".to_string(), "Fixed".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "invalid changelog section(s) found: Removed.\nMust be one of: Added, Fixed"
        );
    }

    #[test]
    fn test_read_failed_carries_path() {
        let err = ChangelogError::ReadFailed {
            path: PathBuf::from("CHANGELOG.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("CHANGELOG.md"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_fragment_error_wraps_git_error() {
        let err: FragmentError = GitError::NoParent {
            commit: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, FragmentError::Git(GitError::NoParent { .. })));
    }
}
