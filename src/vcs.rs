/*!
 * Version-control integration.
 *
 * The pipeline only needs two things from history: which files changed
 * between two snapshots, and what a file looked like at a snapshot. Both are
 * behind the `VersionControl` trait; `GitCli` answers them by running `git`.
 * `ChangeDetector` turns those answers into the manual-override set and the
 * per-document "source changed" flag, degrading to "no overrides, always
 * changed" whenever history is unavailable.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::errors::VcsError;

/// Read access to version-control history
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Absolute paths of files that differ between `from` and `to`
    async fn changed_paths(&self, from: &str, to: &str) -> Result<HashSet<PathBuf>, VcsError>;

    /// Content of `path` at `revision`, `None` when the file is not tracked there
    async fn content_at(&self, path: &Path, revision: &str) -> Result<Option<String>, VcsError>;
}

/// `git` command line backend
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Directory git commands run in; returned paths are joined onto it
    workdir: PathBuf,
}

impl GitCli {
    /// Create a backend rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, VcsError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|e| VcsError::Unavailable(e.to_string()))
    }

    fn command_line(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn changed_paths(&self, from: &str, to: &str) -> Result<HashSet<PathBuf>, VcsError> {
        let args = ["-c", "core.quotePath=false", "diff", "--name-only", "-z", "--relative", from, to];
        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: Self::command_line(&args),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // NUL-separated, unquoted paths
        Ok(String::from_utf8_lossy(&output.stdout)
            .split('\0')
            .filter(|name| !name.is_empty())
            .map(|name| self.workdir.join(name))
            .collect())
    }

    async fn content_at(&self, path: &Path, revision: &str) -> Result<Option<String>, VcsError> {
        let relative = path.strip_prefix(&self.workdir).unwrap_or(path);
        let spec = format!("{}:./{}", revision, relative.to_string_lossy().replace('\\', "/"));
        let args = ["show", spec.as_str()];
        let output = self.run(&args).await?;

        if output.status.success() {
            return Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        // Unknown paths and revisions both mean "no prior version"
        if stderr.contains("does not exist") || stderr.contains("exists on disk, but not in") {
            return Ok(None);
        }
        Err(VcsError::CommandFailed {
            command: Self::command_line(&args),
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Classifies files using version-control history
pub struct ChangeDetector<'a> {
    vcs: &'a dyn VersionControl,
    diff_base: &'a str,
    diff_head: &'a str,
}

impl<'a> ChangeDetector<'a> {
    /// Compare `diff_base` against `diff_head`
    pub fn new(vcs: &'a dyn VersionControl, diff_base: &'a str, diff_head: &'a str) -> Self {
        Self { vcs, diff_base, diff_head }
    }

    /// Output files edited directly inside one of `target_roots`
    ///
    /// Never fails: unavailable history means no overrides are known.
    pub async fn manual_overrides(&self, target_roots: &[PathBuf]) -> HashSet<PathBuf> {
        match self.vcs.changed_paths(self.diff_base, self.diff_head).await {
            Ok(changed) => {
                let overrides: HashSet<PathBuf> = changed
                    .into_iter()
                    .filter(|path| target_roots.iter().any(|root| path.starts_with(root)))
                    .collect();
                if !overrides.is_empty() {
                    info!("Detected {} manually translated file(s)", overrides.len());
                }
                overrides
            }
            Err(e) => {
                info!("Could not detect manual translations (not in a git repository?)");
                debug!("Manual translation detection failed: {}", e);
                HashSet::new()
            }
        }
    }

    /// Whether `current` differs from the committed version of `path`
    ///
    /// Untracked files and unavailable history count as changed.
    pub async fn has_changes(&self, path: &Path, current: &str) -> bool {
        match self.vcs.content_at(path, self.diff_head).await {
            Ok(Some(previous)) => previous != current,
            Ok(None) => true,
            Err(e) => {
                debug!("Could not read committed version of {:?}: {}", path, e);
                true
            }
        }
    }
}
