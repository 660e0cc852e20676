//! Pre-merge gate: make sure a change carries a valid changelog fragment.

use std::path::Path;

use tracing::{debug, info};

use crate::changelog::{SectionMap, classify_fragment, validate_sections};
use crate::config::{IGNORED_SECTION, SectionConfig};
use crate::error::{ChangelogError, CheckError};
use crate::fragment::{Fragment, find_fragments};
use crate::git::{History, walk_range};

/// Classify `lines` and validate the result.
///
/// `label` names the fragment in errors. A fragment must contain at least one
/// section with a bullet; a bare `### Ignored` heading is enough.
pub fn validate_fragment<S: AsRef<str>>(
    label: &str,
    lines: &[S],
    sections: &SectionConfig,
) -> Result<SectionMap, ChangelogError> {
    let mut classified = classify_fragment(lines, "");
    classified.retain(|name, bullets| name == IGNORED_SECTION || !bullets.is_empty());
    if classified.is_empty() {
        return Err(ChangelogError::NoSections {
            path: label.to_string(),
        });
    }
    validate_sections(&classified, sections)?;
    Ok(classified)
}

/// Read and validate one fragment file from disk.
pub fn check_fragment_file(path: &Path, sections: &SectionConfig) -> Result<(), CheckError> {
    let label = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let lines: Vec<&str> = content.lines().collect();
    validate_fragment(&label, &lines, sections).map_err(|source| {
        CheckError::InvalidFragment {
            path: label.clone(),
            source,
        }
    })?;
    debug!("Fragment {} is valid", label);
    Ok(())
}

/// Split a newline-separated fragment listing, skipping blank lines.
pub fn parse_fragment_list(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Validate every fragment listed in the environment variable `env_var`.
///
/// Returns the paths checked.
pub fn check_fragment_env(
    env_var: &str,
    sections: &SectionConfig,
) -> Result<Vec<String>, CheckError> {
    let listing = std::env::var(env_var).unwrap_or_default();
    let paths = parse_fragment_list(&listing);
    if paths.is_empty() {
        return Err(CheckError::EmptyFragmentList(env_var.to_string()));
    }

    for path in &paths {
        check_fragment_file(Path::new(path), sections)?;
    }

    info!("{} fragment(s) valid", paths.len());
    Ok(paths.into_iter().map(str::to_string).collect())
}

/// Find the fragment(s) a branch adds relative to the main line and validate them.
///
/// Diffs the tree at `main_rev` against the tree at `branch`, so the fragment
/// may have been added by any commit on the branch.
pub fn check_branch<H: History + ?Sized>(
    history: &H,
    dir: &str,
    main_rev: &str,
    branch: &str,
    sections: &SectionConfig,
) -> Result<Vec<Fragment>, CheckError> {
    let range = walk_range(history, main_rev, branch)?;
    info!(
        "Looking for changelog fragment between upstream commit {} and branch {} {}",
        range.base.short_id(),
        branch,
        range.tip.short_id()
    );

    let fragments = find_fragments(history, dir, &range.base, &range.tip)
        .map_err(CheckError::MissingFragment)?;

    for fragment in &fragments {
        validate_fragment(&fragment.path, &fragment.lines, sections).map_err(|source| {
            CheckError::InvalidFragment {
                path: fragment.path.clone(),
                source,
            }
        })?;
    }

    Ok(fragments)
}
