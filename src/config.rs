//! Release configuration and `.unclog.yaml` loading.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Directory (relative to the repository root) holding `.unclog.yaml`.
pub const CONFIG_DIR: &str = "changelog";

/// Name of the per-repository config file.
pub const CONFIG_FILE_NAME: &str = ".unclog.yaml";

/// Section name that marks a change as intentionally absent from the changelog.
pub const IGNORED_SECTION: &str = "Ignored";

/// Built-in section order per Keep a Changelog.
pub const DEFAULT_SECTIONS: [&str; 6] = [
    "Added",
    "Changed",
    "Deprecated",
    "Removed",
    "Fixed",
    "Security",
];

/// Ordered list of sections a changelog may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    order: Vec<String>,
}

impl SectionConfig {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    /// Sections in rendering order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn is_permitted(&self, name: &str) -> bool {
        self.order.iter().any(|s| s == name)
    }

    /// Permitted names, sorted.
    pub fn permitted(&self) -> BTreeSet<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECTIONS)
    }
}

/// Owner/repository naming used to build links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: "prysmaticlabs".to_string(),
            repo: "prysm".to_string(),
        }
    }
}

impl RepoConfig {
    fn base_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    pub fn pr_url(&self, pr: u64) -> String {
        format!("{}/pull/{}", self.base_url(), pr)
    }

    pub fn commit_url(&self, sha: &str) -> String {
        format!("{}/commit/{}", self.base_url(), sha)
    }

    pub fn compare_url(&self, from: &str, to: &str) -> String {
        format!("{}/compare/{}...{}", self.base_url(), from, to)
    }
}

/// Everything one release run needs, built once from CLI flags.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub repo_path: PathBuf,
    /// Fragment directory, relative to the repository root.
    pub changes_dir: String,
    /// The new release tag.
    pub tag: String,
    /// Revision the range starts after. Defaults to the previous changelog version.
    pub base: Option<String>,
    /// Revision the range ends at. Defaults to `tag`.
    pub tip: Option<String>,
    /// Previous changelog, relative to the repository root.
    pub previous_path: PathBuf,
    /// Output file, relative to the repository root. Defaults to `previous_path`.
    pub output_path: Option<PathBuf>,
    pub cleanup: bool,
    pub release_date: NaiveDate,
    /// Explicit section order; `.unclog.yaml` or the defaults apply when None.
    pub sections: Option<Vec<String>>,
    pub repo: RepoConfig,
}

impl ReleaseConfig {
    /// Defaults for a release of `tag` in the repository at `repo_path`.
    pub fn new(repo_path: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            changes_dir: CONFIG_DIR.to_string(),
            tag: tag.into(),
            base: None,
            tip: None,
            previous_path: PathBuf::from("CHANGELOG.md"),
            output_path: None,
            cleanup: false,
            release_date: Utc::now().date_naive(),
            sections: None,
            repo: RepoConfig::default(),
        }
    }

    pub fn tip(&self) -> &str {
        self.tip.as_deref().unwrap_or(&self.tag)
    }

    pub fn previous_file(&self) -> PathBuf {
        self.repo_path.join(&self.previous_path)
    }

    pub fn output_file(&self) -> PathBuf {
        let relative = self.output_path.as_ref().unwrap_or(&self.previous_path);
        self.repo_path.join(relative)
    }
}

/// Contents of `.unclog.yaml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UnclogConfig {
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Path of `.unclog.yaml` for the repository at `repo_path`.
pub fn config_path(repo_path: &Path) -> PathBuf {
    repo_path.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
}

/// Read `.unclog.yaml`. A missing file is `Ok(None)`.
pub fn load_unclog_config(repo_path: &Path) -> Result<Option<UnclogConfig>, ConfigError> {
    let path = config_path(repo_path);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    // An empty document deserializes to null rather than a mapping.
    if content.trim().is_empty() {
        return Ok(Some(UnclogConfig::default()));
    }

    let config = serde_yaml::from_str(&content)
        .map_err(|source| ConfigError::ParseFailed { path, source })?;
    Ok(Some(config))
}

/// Pick the section order: explicit list, then `.unclog.yaml`, then the defaults.
pub fn resolve_sections(
    explicit: Option<&[String]>,
    repo_path: &Path,
) -> Result<SectionConfig, ConfigError> {
    if let Some(sections) = explicit.filter(|s| !s.is_empty()) {
        return Ok(SectionConfig::new(sections.iter().cloned()));
    }

    match load_unclog_config(repo_path)? {
        Some(file) if !file.sections.is_empty() => {
            debug!(
                "Using sections from {}: {}",
                config_path(repo_path).display(),
                file.sections.join(", ")
            );
            Ok(SectionConfig::new(file.sections))
        }
        _ => Ok(SectionConfig::default()),
    }
}
