//! Assemble the release changelog and write it out.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{IGNORED_SECTION, RepoConfig, SectionConfig};
use crate::error::ChangelogError;
use crate::fragment::Fragment;

use super::classify::{SectionMap, classify_fragment, merge_sections};
use super::format::{PREAMBLE, format_section, reference_link};
use super::parser::PreviousChangelog;

/// Classify every fragment and merge the results, keeping fragment order
/// within each section.
pub fn merge_entries(fragments: &[Fragment], repo: &RepoConfig) -> SectionMap {
    let mut merged = SectionMap::new();
    for fragment in fragments {
        let reference = reference_link(&fragment.commit, repo);
        merge_sections(&mut merged, classify_fragment(&fragment.lines, &reference));
    }
    merged
}

/// Render the full changelog: preamble, the new release, then the previous body.
///
/// Sections follow `sections` order. Empty sections, sections missing from
/// `sections`, and `Ignored` are left out.
pub fn render_changelog(
    header: &str,
    entries: &SectionMap,
    sections: &SectionConfig,
    previous: &PreviousChangelog,
) -> String {
    let mut body = format!("{}\n\n{}", PREAMBLE, header);

    for name in sections.order() {
        if name == IGNORED_SECTION {
            continue;
        }
        match entries.get(name) {
            Some(bullets) if !bullets.is_empty() => body.push_str(&format_section(name, bullets)),
            _ => {}
        }
    }

    body.push_str("\n\n");
    body.push_str(&previous.body);
    body
}

/// Write `content` to `path` through a temporary file in the same directory.
pub fn write_changelog(path: &Path, content: &str) -> Result<(), ChangelogError> {
    let write_failed = |source: std::io::Error| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    file.write_all(content.as_bytes()).map_err(write_failed)?;
    file.persist(path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Delete each fragment file from the working tree under `repo_root`.
///
/// Stops at the first failure. Returns the paths removed.
pub fn cleanup_fragments(
    repo_root: &Path,
    fragments: &[Fragment],
) -> Result<Vec<PathBuf>, ChangelogError> {
    let mut removed = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let path = repo_root.join(&fragment.path);
        std::fs::remove_file(&path).map_err(|source| ChangelogError::RemoveFailed {
            path: path.clone(),
            source,
        })?;
        info!("Removed fragment {}", path.display());
        removed.push(path);
    }
    Ok(removed)
}

/// Generate a summary message for the user.
pub fn generate_summary(entries: &SectionMap, sections: &SectionConfig) -> String {
    let counts: Vec<String> = sections
        .order()
        .iter()
        .filter_map(|name| {
            entries
                .get(name)
                .filter(|bullets| !bullets.is_empty())
                .map(|bullets| format!("{}: {}", name, bullets.len()))
        })
        .collect();

    if counts.is_empty() {
        return "No changelog entries in this release.".to_string();
    }

    let total: usize = sections
        .order()
        .iter()
        .filter_map(|name| entries.get(name))
        .map(Vec::len)
        .sum();
    let entry_word = if total == 1 { "entry" } else { "entries" };

    format!("{} {} ({})", total, entry_word, counts.join(", "))
}
