//! [`VersionControl`] backed by the system `git` binary and git2.
//!
//! Mutating operations shell out to `git`, inheriting the runner's config and
//! credential helpers. The changed-file listing reads the object database
//! directly through git2.

use std::path::PathBuf;
use std::process::{Command, Output};

use git2::{Delta, Repository};
use tracing::warn;

use crate::error::GitError;

use super::{RunContext, Trigger, VersionControl};

/// Git gateway rooted at a working directory.
pub struct GitCli {
    workdir: PathBuf,
    event_name: Option<String>,
}

impl GitCli {
    /// Create a gateway for the repository at `workdir`.
    ///
    /// `event_name` is the CI event that triggered the run, if any.
    pub fn new(workdir: impl Into<PathBuf>, event_name: Option<String>) -> Self {
        Self {
            workdir: workdir.into(),
            event_name,
        }
    }

    fn output(&self, args: &[&str], operation: &str) -> Result<Output, GitError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })
    }

    /// Run a git command and return its stdout, or a descriptive error.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let output = self.output(args, operation)?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: diagnostic(&output),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl VersionControl for GitCli {
    fn changed_files(&self) -> Result<Vec<String>, GitError> {
        let repo = Repository::open(&self.workdir).map_err(GitError::OpenRepository)?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(GitError::Diff)?;
        let tree = head.tree().map_err(GitError::Diff)?;

        // Root commits are compared against the empty tree.
        let parent_tree = if head.parent_count() > 0 {
            Some(
                head.parent(0)
                    .and_then(|p| p.tree())
                    .map_err(GitError::Diff)?,
            )
        } else {
            None
        };

        let diff = repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(GitError::Diff)?;

        let files = diff
            .deltas()
            .filter(|delta| delta.status() != Delta::Deleted)
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();

        Ok(files)
    }

    fn stage(&self, path: &str) -> Result<(), GitError> {
        self.run_git(&["add", "--", path], "add")?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool, GitError> {
        let output = self.output(&["diff", "--staged", "--quiet"], "diff --staged")?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed {
                operation: "diff --staged".to_string(),
                stderr: diagnostic(&output),
            }),
        }
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        let output = self.output(&["commit", "-m", message], "commit")?;

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains("nothing to commit") || stdout.contains("no changes added to commit") {
            return Err(GitError::NothingToCommit);
        }

        Err(GitError::CommandFailed {
            operation: "commit".to_string(),
            stderr: diagnostic(&output),
        })
    }

    fn push(&self) -> Result<(), GitError> {
        let output = self.output(&["push"], "push")?;
        if !output.status.success() {
            return Err(GitError::PushRejected {
                stderr: diagnostic(&output),
            });
        }
        Ok(())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        let stdout = self.run_git(&["branch", "--show-current"], "branch --show-current")?;
        Ok(stdout.trim().to_string())
    }

    fn status(&self) -> Result<String, GitError> {
        self.run_git(&["status"], "status")
    }

    fn configure_identity(&self, name: &str, email: &str) -> Result<(), GitError> {
        self.run_git(&["config", "user.name", name], "config user.name")?;
        self.run_git(&["config", "user.email", email], "config user.email")?;
        Ok(())
    }

    fn trigger_context(&self) -> RunContext {
        let branch = match self.current_branch() {
            Ok(branch) if !branch.is_empty() => Some(branch),
            Ok(_) => None,
            Err(e) => {
                warn!("Could not read current branch: {}", e);
                None
            }
        };

        RunContext {
            trigger: Trigger::from_event_name(self.event_name.as_deref()),
            branch,
        }
    }
}

/// Best diagnostic text from a failed command: stderr, else stdout.
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
