//! Error types for dokimos modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from building the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set. The generation service needs a credential.")]
    MissingApiKey,

    #[error("No supported languages enabled. Set LANGUAGES to a comma-separated list of: swift, kotlin")]
    NoLanguagesEnabled,
}

/// Errors from version-control operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to diff the latest commit: {0}")]
    Diff(#[source] git2::Error),

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Push rejected: {stderr}")]
    PushRejected { stderr: String },
}

/// Errors from building a generation request or calling the service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Unsupported file type: {0}")]
    UnsupportedLanguage(String),

    #[error("Generation request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Generation service returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation service returned no code")]
    EmptyResponse,
}

/// Errors from writing a generated test file.
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the pipeline runner.
///
/// Per-file variants are caught and logged by the runner; only `Git` can end
/// a run early, and only when the change set itself cannot be determined.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read source file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Git(#[from] GitError),
}

impl PipelineError {
    /// Short failure-kind label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ReadFailed(_) => "ReadFailed",
            PipelineError::Generation(GenerationError::UnsupportedLanguage(_)) => {
                "UnsupportedLanguage"
            }
            PipelineError::Generation(_) => "GenerationFailed",
            PipelineError::Materialize(_) => "WriteFailed",
            PipelineError::Git(GitError::PushRejected { .. }) => "PushRejected",
            PipelineError::Git(GitError::NothingToCommit) => "NoOpCommit",
            PipelineError::Git(_) => "GitFailed",
        }
    }
}
