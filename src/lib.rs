//! dokimos - A CI helper that generates unit tests for the files changed in
//! the latest commit.
//!
//! # Overview
//!
//! dokimos lists the files touched by HEAD, asks a code-generation service
//! for unit tests for each supported source file, writes the tests next to
//! their sources, and commits (and, outside pull requests, pushes) them back.
//! A failure for one file never stops the others.

pub mod changeset;
pub mod commit;
pub mod config;
pub mod error;
pub mod generation;
pub mod git;
pub mod language;
pub mod materialize;
pub mod pipeline;

// Re-export commonly used types
pub use commit::CommitOutcome;
pub use config::Config;
pub use error::{ConfigError, GenerationError, GitError, MaterializeError, PipelineError};
pub use generation::{GenerationClient, GenerationRequest, OpenAiClient};
pub use git::{GitCli, RunContext, Trigger, VersionControl};
pub use language::{Language, LanguageSet};
pub use materialize::TestArtifact;
pub use pipeline::{FileFailure, Pipeline, RunReport};
