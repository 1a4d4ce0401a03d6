//! Version-control gateway.
//!
//! The pipeline talks to git only through [`VersionControl`], so it can run
//! against a scripted fake in tests.

pub mod cli;

use std::fmt;

use crate::error::GitError;

pub use cli::GitCli;

/// CI event name that marks a review request.
pub const REVIEW_REQUEST_EVENT: &str = "pull_request";

/// What triggered the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A pull request. The hosting platform picks up the commit without a push.
    ReviewRequest,
    /// A push or any other event; carries the raw event name when known.
    Push(Option<String>),
}

impl Trigger {
    pub fn from_event_name(event: Option<&str>) -> Self {
        match event {
            Some(REVIEW_REQUEST_EVENT) => Trigger::ReviewRequest,
            other => Trigger::Push(other.map(str::to_string)),
        }
    }

    pub fn is_review_request(&self) -> bool {
        matches!(self, Trigger::ReviewRequest)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::ReviewRequest => f.write_str(REVIEW_REQUEST_EVENT),
            Trigger::Push(Some(event)) => f.write_str(event),
            Trigger::Push(None) => f.write_str("(none)"),
        }
    }
}

/// Read-only facts about the run, sourced from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub trigger: Trigger,
    /// Current branch, when it could be read. Only used for logging.
    pub branch: Option<String>,
}

/// Operations the pipeline needs from version control.
///
/// Every git operation is fallible and reports the tool's diagnostic text; none
/// of them panic.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Files touched by the latest commit relative to its first parent, in
    /// path order.
    fn changed_files(&self) -> Result<Vec<String>, GitError>;

    /// Stage a single path.
    fn stage(&self, path: &str) -> Result<(), GitError>;

    /// Whether the index differs from HEAD.
    fn has_staged_changes(&self) -> Result<bool, GitError>;

    /// Commit staged changes. Fails with [`GitError::NothingToCommit`] when
    /// nothing is staged.
    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Push the current branch. Fails with [`GitError::PushRejected`].
    fn push(&self) -> Result<(), GitError>;

    fn current_branch(&self) -> Result<String, GitError>;

    /// Human-readable working tree status.
    fn status(&self) -> Result<String, GitError>;

    /// Set the committer identity for this repository.
    fn configure_identity(&self, name: &str, email: &str) -> Result<(), GitError>;

    /// Trigger and branch of the current run.
    ///
    /// The trigger comes from the CI event name alone; a failed branch query
    /// leaves `branch` empty instead of failing.
    fn trigger_context(&self) -> RunContext;
}
