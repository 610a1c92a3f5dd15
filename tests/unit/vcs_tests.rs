/*!
 * Tests for version-control integration and change detection
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

use doctrans::vcs::{ChangeDetector, GitCli, VersionControl};

use crate::common::{self, fakes::FakeVcs};

/// Test that only paths below target roots count as manual overrides
#[tokio::test]
async fn test_manual_overrides_withMixedChanges_shouldKeepTargetPathsOnly() {
    let vcs = FakeVcs::new()
        .with_changed("/docs/en/guide/intro.md")
        .with_changed("/docs/zh/guide/intro.md")
        .with_changed("/docs/ja/index.mdx")
        .with_changed("/docs/english/other.md")
        .with_changed("/src/main.rs");
    let detector = ChangeDetector::new(&vcs, "HEAD~1", "HEAD");

    let overrides = detector
        .manual_overrides(&[PathBuf::from("/docs/en"), PathBuf::from("/docs/ja")])
        .await;

    assert_eq!(overrides.len(), 2);
    assert!(overrides.contains(Path::new("/docs/en/guide/intro.md")));
    assert!(overrides.contains(Path::new("/docs/ja/index.mdx")));
}

/// Test degradation outside a repository
#[tokio::test]
async fn test_detector_withUnavailableHistory_shouldAssumeNoOverridesAndChanged() {
    let vcs = FakeVcs::unavailable();
    let detector = ChangeDetector::new(&vcs, "HEAD~1", "HEAD");

    assert!(detector.manual_overrides(&[PathBuf::from("/docs/en")]).await.is_empty());
    assert!(detector.has_changes(Path::new("/docs/zh/a.md"), "content").await);
}

/// Test comparison against the committed version
#[tokio::test]
async fn test_has_changes_withCommittedVersion_shouldCompareContent() {
    let vcs = FakeVcs::new().with_committed("/docs/zh/a.md", "old");
    let detector = ChangeDetector::new(&vcs, "main", "release");

    assert!(!detector.has_changes(Path::new("/docs/zh/a.md"), "old").await);
    assert!(detector.has_changes(Path::new("/docs/zh/a.md"), "new").await);
    assert!(detector.has_changes(Path::new("/docs/zh/untracked.md"), "new").await);
    assert_eq!(*vcs.revisions.lock(), vec!["release", "release", "release"]);
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Test the git backend against a throwaway repository
#[tokio::test]
async fn test_git_cli_withRealRepository_shouldReportDiffAndContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    if !git(root, &["init", "-q"]) {
        // No git binary available
        return Ok(());
    }
    git(root, &["config", "user.email", "docs@example.com"]);
    git(root, &["config", "user.name", "Docs"]);

    common::create_test_file(root, "content/docs/zh/a.md", "第一版")?;
    common::create_test_file(root, "content/docs/en/a.md", "First")?;
    assert!(git(root, &["add", "."]));
    assert!(git(root, &["-c", "commit.gpgsign=false", "commit", "-q", "-m", "initial"]));

    common::create_test_file(root, "content/docs/en/a.md", "First, edited by hand")?;
    assert!(git(root, &["-c", "commit.gpgsign=false", "commit", "-q", "-am", "manual fix"]));

    let vcs = GitCli::new(root);
    let changed = vcs.changed_paths("HEAD~1", "HEAD").await?;
    assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![root.join("content/docs/en/a.md")]);

    let committed = vcs.content_at(&root.join("content/docs/zh/a.md"), "HEAD").await?;
    assert_eq!(committed.as_deref(), Some("第一版"));

    let missing = vcs.content_at(&root.join("content/docs/zh/new.md"), "HEAD").await?;
    assert_eq!(missing, None);
    Ok(())
}

/// Test that hand edits to non-ASCII file names are reported unquoted
#[tokio::test]
async fn test_git_cli_withCjkFileName_shouldDetectManualOverride() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    if !git(root, &["init", "-q"]) {
        // No git binary available
        return Ok(());
    }
    git(root, &["config", "user.email", "docs@example.com"]);
    git(root, &["config", "user.name", "Docs"]);
    git(root, &["config", "core.quotePath", "true"]);

    common::create_test_file(root, "content/docs/zh/指南.md", "# 指南")?;
    common::create_test_file(root, "content/docs/en/指南.md", "# Guide")?;
    assert!(git(root, &["add", "."]));
    assert!(git(root, &["-c", "commit.gpgsign=false", "commit", "-q", "-m", "initial"]));

    common::create_test_file(root, "content/docs/en/指南.md", "# Guide, polished by hand")?;
    assert!(git(root, &["-c", "commit.gpgsign=false", "commit", "-q", "-am", "manual fix"]));

    let vcs = GitCli::new(root);
    let edited = root.join("content/docs/en/指南.md");
    let changed = vcs.changed_paths("HEAD~1", "HEAD").await?;
    assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![edited.clone()]);

    let detector = ChangeDetector::new(&vcs, "HEAD~1", "HEAD");
    let overrides = detector.manual_overrides(&[root.join("content/docs/en")]).await;
    assert!(overrides.contains(&edited));
    Ok(())
}

/// Test the git backend outside any repository
#[tokio::test]
async fn test_git_cli_outsideRepository_shouldFailAndDetectorShouldDegrade() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let vcs = GitCli::new(temp_dir.path());

    assert!(vcs.changed_paths("HEAD~1", "HEAD").await.is_err());

    let detector = ChangeDetector::new(&vcs, "HEAD~1", "HEAD");
    assert!(detector.manual_overrides(&[temp_dir.path().join("en")]).await.is_empty());
    assert!(detector.has_changes(&temp_dir.path().join("zh/a.md"), "x").await);
    Ok(())
}
