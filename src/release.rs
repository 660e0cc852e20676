//! Release pipeline: turn the fragments added since the last release into a
//! new changelog section on top of the previous changelog.

use std::path::PathBuf;

use tracing::info;

use crate::changelog::format::format_header;
use crate::changelog::{
    SectionMap, cleanup_fragments, merge_entries, read_previous, render_changelog,
    write_changelog,
};
use crate::config::{ReleaseConfig, SectionConfig, resolve_sections};
use crate::error::ReleaseError;
use crate::fragment::{Fragment, collect_fragments};
use crate::git::{History, walk_range};

/// Result of assembling a release in memory.
#[derive(Debug, Clone)]
pub struct ReleaseOutput {
    /// Full changelog text to write.
    pub body: String,
    /// Surviving fragments, tip first.
    pub fragments: Vec<Fragment>,
    /// Merged entries by section.
    pub entries: SectionMap,
    pub sections: SectionConfig,
    /// Number of commits walked.
    pub commit_count: usize,
}

/// What [`run_release`] did on disk.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub output: ReleaseOutput,
    pub written_to: PathBuf,
    pub removed: Vec<PathBuf>,
}

/// Assemble the changelog for `config.tag` without touching the filesystem
/// beyond reading the previous changelog and `.unclog.yaml`.
pub fn build_release<H: History + ?Sized>(
    history: &H,
    config: &ReleaseConfig,
) -> Result<ReleaseOutput, ReleaseError> {
    let previous = read_previous(&config.previous_file())?;
    let sections = resolve_sections(config.sections.as_deref(), &config.repo_path)?;

    let base = config.base.as_deref().unwrap_or(&previous.version);
    let range = walk_range(history, base, config.tip())?;
    info!(
        "Collecting fragments from {} commits between {} and {}",
        range.len(),
        range.base_ref,
        range.tip_ref
    );

    let fragments = collect_fragments(history, &config.changes_dir, &range)?;
    info!("Found {} changelog fragments", fragments.len());

    let entries = merge_entries(&fragments, &config.repo);
    let header = format_header(&config.tag, base, config.release_date, &config.repo);
    let body = render_changelog(&header, &entries, &sections, &previous);

    Ok(ReleaseOutput {
        body,
        fragments,
        entries,
        sections,
        commit_count: range.len(),
    })
}

/// Build the release, write it to the output path, then remove the fragment
/// files if `config.cleanup` is set.
pub fn run_release<H: History + ?Sized>(
    history: &H,
    config: &ReleaseConfig,
) -> Result<ReleaseReport, ReleaseError> {
    let output = build_release(history, config)?;

    let written_to = config.output_file();
    write_changelog(&written_to, &output.body)?;
    info!("Wrote changelog for {} to {}", config.tag, written_to.display());

    let removed = if config.cleanup {
        cleanup_fragments(&config.repo_path, &output.fragments)?
    } else {
        Vec::new()
    };

    Ok(ReleaseReport {
        output,
        written_to,
        removed,
    })
}
