//! Read the previously published changelog.

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::ChangelogError;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#+ \[(v\d+\.\d+\.\d+)\]").expect("version heading pattern is valid")
});

/// The previous changelog with its preamble dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousChangelog {
    /// Version of the most recent release, e.g. `v5.1.0`.
    pub version: String,
    /// Everything from the most recent release heading onward, verbatim.
    pub body: String,
}

/// Version from a release heading such as `## [v1.2.3](...) - 2024-01-01`.
pub fn version_from_line(line: &str) -> Option<&str> {
    VERSION_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split `content` at its first release heading.
///
/// Returns None when no line carries a version heading.
pub fn parse_previous(content: &str) -> Option<PreviousChangelog> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if let Some(version) = version_from_line(line) {
            return Some(PreviousChangelog {
                version: version.to_string(),
                body: content[offset..].to_string(),
            });
        }
        offset += line.len();
    }
    None
}

/// Read and split the changelog at `path`.
pub fn read_previous(path: &Path) -> Result<PreviousChangelog, ChangelogError> {
    let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    parse_previous(&content).ok_or_else(|| ChangelogError::PreviousVersionNotFound {
        path: path.to_path_buf(),
    })
}
