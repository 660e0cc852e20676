//! Classify fragment lines into sections and validate section names.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::config::{IGNORED_SECTION, SectionConfig};
use crate::error::ChangelogError;

/// Section name to ordered bullet entries.
pub type SectionMap = BTreeMap<String, Vec<String>>;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6} (\w+)\s?$").expect("section pattern is valid"));

static PR_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[PR\]\]\(https://[^\)]+\)").expect("PR link pattern is valid")
});

/// Parser state while folding over fragment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    NoSection,
    InSection(String),
}

/// Section name if `line` is a level 1-6 heading with a single word.
pub fn parse_section(line: &str) -> Option<&str> {
    SECTION_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Render a bullet line with its reference annotation.
///
/// Returns None unless the line starts with `- ` after leading spaces. Lines
/// that already embed a `[[PR]](https://...)` link are returned unchanged.
pub fn annotate_bullet(line: &str, reference: &str) -> Option<String> {
    if !line.trim_start_matches(' ').starts_with("- ") {
        return None;
    }
    if PR_LINK_RE.is_match(line) {
        return Some(line.to_string());
    }
    Some(format!(
        "{}. {}",
        line.trim_end_matches([' ', '.']),
        reference
    ))
}

/// Classify fragment lines into sections.
///
/// Every heading creates its section key, even when no bullet follows.
/// Lines before the first heading and non-bullet lines are skipped.
pub fn classify_fragment<S: AsRef<str>>(lines: &[S], reference: &str) -> SectionMap {
    let (_, sections) = lines.iter().map(|line| line.as_ref()).fold(
        (ParseState::NoSection, SectionMap::new()),
        |(state, mut sections), line| {
            if let Some(name) = parse_section(line) {
                sections.entry(name.to_string()).or_default();
                return (ParseState::InSection(name.to_string()), sections);
            }
            if let ParseState::InSection(current) = &state {
                if let Some(bullet) = annotate_bullet(line, reference) {
                    sections.entry(current.clone()).or_default().push(bullet);
                }
            }
            (state, sections)
        },
    );
    sections
}

/// Append every entry of `other` onto `into`, section by section.
pub fn merge_sections(into: &mut SectionMap, other: SectionMap) {
    for (name, entries) in other {
        into.entry(name).or_default().extend(entries);
    }
}

/// Check that every section other than `Ignored` is permitted.
pub fn validate_sections(
    sections: &SectionMap,
    permitted: &SectionConfig,
) -> Result<(), ChangelogError> {
    let invalid: Vec<String> = sections
        .keys()
        .filter(|name| name.as_str() != IGNORED_SECTION && !permitted.is_permitted(name))
        .cloned()
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }

    Err(ChangelogError::InvalidSection {
        invalid,
        allowed: permitted
            .permitted()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
