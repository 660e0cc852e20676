//! Locate the fragment file(s) a commit introduced.

use tracing::{debug, warn};

use crate::config::CONFIG_FILE_NAME;
use crate::error::FragmentError;
use crate::git::{ChangeAction, Commit, History};

use super::Fragment;

/// Diff `child` against `parent` under `dir` and read every added or
/// modified file as a fragment, in diff order.
///
/// Returns [`FragmentError::NoFragment`] when the commit touched no file
/// under `dir`. More than one match is allowed but logged.
pub fn find_fragments<H: History + ?Sized>(
    history: &H,
    dir: &str,
    parent: &Commit,
    child: &Commit,
) -> Result<Vec<Fragment>, FragmentError> {
    let changes = history.diff(parent, child, dir)?;

    let paths: Vec<&str> = changes
        .iter()
        .filter(|change| matches!(change.action, ChangeAction::Added | ChangeAction::Modified))
        .filter(|change| change.file_name() != CONFIG_FILE_NAME)
        .map(|change| change.path())
        .collect();

    if paths.is_empty() {
        return Err(FragmentError::NoFragment {
            commit: child.id.clone(),
        });
    }

    if paths.len() > 1 {
        warn!(
            "Commit {} touches {} fragment files: {}",
            child.short_id(),
            paths.len(),
            paths.join(", ")
        );
    }

    let mut fragments = Vec::with_capacity(paths.len());
    for path in paths {
        let content = history.read_file(child, path)?;
        debug!("Found fragment {} in commit {}", path, child.short_id());
        fragments.push(Fragment {
            commit: child.clone(),
            path: path.to_string(),
            lines: content.lines().map(str::to_string).collect(),
        });
    }

    Ok(fragments)
}
