//! Staging, committing and pushing generated tests.
//!
//! One run walks a small state machine:
//!
//! ```text
//! Idle -> Staged -> NoChange
//!                -> Committed -> CommitOnly   (review request)
//!                             -> Pushed
//!                             -> PushFailed   (commit is kept)
//! ```

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::error::GitError;
use crate::git::{RunContext, VersionControl};
use crate::materialize::TestArtifact;

/// Message used for every generated-tests commit.
pub const COMMIT_MESSAGE: &str = "Add auto-generated unit tests";

/// Committer name for generated-tests commits.
pub const BOT_NAME: &str = "GitHub Test Generator Bot";

/// Placeholder committer email.
pub const BOT_EMAIL: &str = "<>";

/// Terminal state of a commit run. Every variant is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The staged files matched HEAD; nothing was committed.
    NoChange,
    /// Committed without pushing (review-request trigger).
    CommitOnly,
    /// Committed and pushed.
    Pushed,
    /// Committed, but the push failed. The commit is not rolled back.
    PushFailed { reason: String },
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::NoChange => f.write_str("no changes to commit"),
            CommitOutcome::CommitOnly => f.write_str("committed (not pushed)"),
            CommitOutcome::Pushed => f.write_str("committed and pushed"),
            CommitOutcome::PushFailed { reason } => {
                write!(f, "committed, push failed: {}", reason)
            }
        }
    }
}

/// Stage `artifacts`, commit them, and push unless the run is a review request.
///
/// Must be called with at least one artifact; the runner skips this step
/// entirely when nothing was produced. Errors from staging or committing are
/// returned; a push failure is reported as [`CommitOutcome::PushFailed`].
/// Status and identity setup are best-effort and only logged on failure.
pub fn coordinate<V: VersionControl + ?Sized>(
    vcs: &V,
    artifacts: &[TestArtifact],
    context: &RunContext,
) -> Result<CommitOutcome, GitError> {
    match vcs.status() {
        Ok(status) => debug!("Git status before committing:\n{}", status.trim_end()),
        Err(e) => warn!("Could not read git status: {}", e),
    }

    if let Err(e) = vcs.configure_identity(BOT_NAME, BOT_EMAIL) {
        warn!("Could not configure committer identity: {}", e);
    }

    // Idle -> Staged
    let paths: BTreeSet<String> = artifacts
        .iter()
        .map(|a| a.path.to_string_lossy().to_string())
        .collect();
    for path in &paths {
        vcs.stage(path)?;
        info!("Staged file: {}", path);
    }

    info!("Trigger: {}", context.trigger);

    // Staged -> NoChange
    if !vcs.has_staged_changes()? {
        info!("No changes to commit");
        return Ok(CommitOutcome::NoChange);
    }

    // Staged -> Committed
    match vcs.commit(COMMIT_MESSAGE) {
        Ok(()) => {}
        Err(GitError::NothingToCommit) => {
            info!("No changes to commit");
            return Ok(CommitOutcome::NoChange);
        }
        Err(e) => return Err(e),
    }

    // Committed -> CommitOnly
    if context.trigger.is_review_request() {
        info!("Created commit with generated tests. Changes will appear in the pull request.");
        return Ok(CommitOutcome::CommitOnly);
    }

    // Committed -> Pushed | PushFailed
    info!(
        "Pushing to branch: {}",
        context.branch.as_deref().unwrap_or("(unknown)")
    );
    match vcs.push() {
        Ok(()) => {
            info!("Committed and pushed generated tests successfully.");
            Ok(CommitOutcome::Pushed)
        }
        Err(e) => {
            error!(kind = "PushRejected", "Push failed: {}", e);
            Ok(CommitOutcome::PushFailed {
                reason: e.to_string(),
            })
        }
    }
}
