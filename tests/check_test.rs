//! Integration tests for the pre-merge fragment check.

mod common;

use common::{Change, TestRepo};
use serial_test::serial;
use unclog::check::{check_branch, check_fragment_env};
use unclog::{ChangelogError, CheckError, FragmentError, SectionConfig};

const FRAGMENT_ENV: &str = "UNCLOG_TEST_FRAGMENTS";

// =============================================================================
// Environment listing
// =============================================================================

#[test]
#[serial]
fn test_env_listing_all_valid() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.md");
    let second = dir.path().join("second.md");
    std::fs::write(&first, "### Added\n- thing\n").unwrap();
    std::fs::write(&second, "### Ignored\n").unwrap();

    let listing = format!("{}\n\n{}\n", first.display(), second.display());
    let checked = temp_env::with_var(FRAGMENT_ENV, Some(&listing), || {
        check_fragment_env(FRAGMENT_ENV, &SectionConfig::default())
    })
    .unwrap();

    assert_eq!(checked.len(), 2);
}

#[test]
#[serial]
fn test_env_listing_with_invalid_section() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.md");
    let bad = dir.path().join("bad.md");
    std::fs::write(&good, "### Fixed\n- fine\n").unwrap();
    std::fs::write(&bad, "### Improvements\n- faster\n").unwrap();

    let listing = format!("{}\n{}", good.display(), bad.display());
    let result = temp_env::with_var(FRAGMENT_ENV, Some(&listing), || {
        check_fragment_env(FRAGMENT_ENV, &SectionConfig::default())
    });

    match result {
        Err(CheckError::InvalidFragment { path, source }) => {
            assert!(path.ends_with("bad.md"), "path: {}", path);
            assert!(matches!(source, ChangelogError::InvalidSection { .. }));
        }
        other => panic!("Expected InvalidFragment, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_env_listing_unset_or_blank() {
    let unset = temp_env::with_var_unset(FRAGMENT_ENV, || {
        check_fragment_env(FRAGMENT_ENV, &SectionConfig::default())
    });
    assert!(matches!(unset, Err(CheckError::EmptyFragmentList(_))));

    let blank = temp_env::with_var(FRAGMENT_ENV, Some("\n  \n"), || {
        check_fragment_env(FRAGMENT_ENV, &SectionConfig::default())
    });
    assert!(matches!(blank, Err(CheckError::EmptyFragmentList(_))));
}

// =============================================================================
// Branch comparison
// =============================================================================

/// Repository with a `develop` branch at the first commit and HEAD one or more
/// commits ahead of it.
fn branch_repo() -> TestRepo {
    let test_repo = TestRepo::new();
    let base = test_repo.commit("main line");
    test_repo.branch("develop", base);
    test_repo
}

#[test]
fn test_branch_with_valid_fragment() {
    let test_repo = branch_repo();
    test_repo.commit_changes(
        "Add feature",
        &[Change::Write("changelog/me_feature.md", "### Added\n- feature\n")],
    );
    test_repo.commit("Follow-up without fragment");

    let history = test_repo.history();
    let fragments = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    )
    .unwrap();

    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].path, "changelog/me_feature.md");
}

#[test]
fn test_branch_without_fragment() {
    let test_repo = branch_repo();
    test_repo.commit("Code only");

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CheckError::MissingFragment(FragmentError::NoFragment { .. }))
    ));
}

#[test]
fn test_branch_with_invalid_section() {
    let test_repo = branch_repo();
    test_repo.commit_changes(
        "Add fragment",
        &[Change::Write("changelog/me.md", "### Misc\n- stuff\n")],
    );

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    );

    match result {
        Err(CheckError::InvalidFragment { path, source }) => {
            assert_eq!(path, "changelog/me.md");
            match source {
                ChangelogError::InvalidSection { invalid, .. } => assert_eq!(invalid, vec!["Misc"]),
                other => panic!("Expected InvalidSection, got {:?}", other),
            }
        }
        other => panic!("Expected InvalidFragment, got {:?}", other),
    }
}

#[test]
fn test_branch_fragment_without_heading() {
    let test_repo = branch_repo();
    test_repo.commit_changes(
        "Add fragment",
        &[Change::Write("changelog/me.md", "- just a bullet\n")],
    );

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CheckError::InvalidFragment {
            source: ChangelogError::NoSections { .. },
            ..
        })
    ));
}

#[test]
fn test_branch_fragment_without_bullets() {
    let test_repo = branch_repo();
    test_repo.commit_changes(
        "Add fragment",
        &[Change::Write(
            "changelog/me.md",
            "### Fixed\nFixed the thing\n* not a dash bullet\n",
        )],
    );

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CheckError::InvalidFragment {
            source: ChangelogError::NoSections { .. },
            ..
        })
    ));
}

#[test]
fn test_branch_behind_main_is_unreachable() {
    let test_repo = TestRepo::new();
    let branch_point = test_repo.commit("main line");
    test_repo.branch("feature", branch_point);
    let main_tip = test_repo.commit("main moved on");
    test_repo.branch("develop", main_tip);

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "feature",
        &SectionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CheckError::Git(unclog::GitError::BaseNotReachable { .. }))
    ));
}

#[test]
fn test_branch_even_with_main_is_empty_range() {
    let test_repo = branch_repo();

    let history = test_repo.history();
    let result = check_branch(
        &history,
        "changelog",
        "develop",
        "HEAD",
        &SectionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(CheckError::Git(unclog::GitError::EmptyRange { .. }))
    ));
}
