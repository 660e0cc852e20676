//! Fixed changelog text: preamble, release header, section blocks and
//! reference links.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex_lite::Regex;

use crate::config::RepoConfig;
use crate::git::Commit;

/// Preamble written at the top of every generated changelog.
pub const PREAMBLE: &str = "# Changelog

All notable changes to this project will be documented in this file.

The format is based on Keep a Changelog, and this project adheres to Semantic Versioning.";

static PR_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("PR number pattern is valid"));

/// Pull request number from a squash-merge summary like `Fix thing (#1234)`.
///
/// The last match wins, so a title quoting another PR still resolves to its own.
pub fn pr_number(summary: &str) -> Option<u64> {
    PR_NUMBER_RE
        .captures_iter(summary)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Reference annotation appended to bullets from `commit`.
pub fn reference_link(commit: &Commit, repo: &RepoConfig) -> String {
    match pr_number(&commit.summary) {
        Some(pr) => format!("[[PR]]({})", repo.pr_url(pr)),
        None => format!("[[commit]]({})", repo.commit_url(commit.short_id())),
    }
}

/// Release header line, e.g.
/// `## [v5.1.1](https://github.com/o/r/compare/v5.1.0...v5.1.1) - 2024-10-15`.
pub fn format_header(tag: &str, base: &str, date: NaiveDate, repo: &RepoConfig) -> String {
    format!(
        "## [{}]({}) - {}",
        tag,
        repo.compare_url(base, tag),
        date.format("%Y-%m-%d")
    )
}

/// One `### <name>` block, prefixed with the blank line that separates it from
/// whatever precedes it.
pub fn format_section(name: &str, bullets: &[String]) -> String {
    let mut section = format!("\n\n### {}\n", name);
    for bullet in bullets {
        section.push('\n');
        section.push_str(bullet);
    }
    section
}
