//! The end-to-end run: change set → generate → normalize → write → commit.

use std::path::Path;

use tracing::{error, info, warn};

use crate::changeset::resolve_change_set;
use crate::commit::{CommitOutcome, coordinate};
use crate::config::Config;
use crate::error::{GenerationError, PipelineError};
use crate::generation::{Extraction, GenerationClient, build_request, normalize};
use crate::git::VersionControl;
use crate::materialize::{TestArtifact, write_artifact};

/// A file that produced no artifact, and why.
#[derive(Debug)]
pub struct FileFailure {
    pub path: String,
    pub error: PipelineError,
}

/// Summary of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files selected for generation, in processing order.
    pub change_set: Vec<String>,
    /// Artifacts currently on disk, one per test path.
    pub artifacts: Vec<TestArtifact>,
    /// Artifacts overwritten later in the run by another source mapping to
    /// the same test path.
    pub superseded: Vec<TestArtifact>,
    pub failures: Vec<FileFailure>,
    /// `None` when the commit step was skipped (no artifacts, or dry run).
    pub outcome: Option<CommitOutcome>,
    /// Staging or committing failed.
    pub commit_error: Option<PipelineError>,
}

impl RunReport {
    /// Whether any part of the run failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
            || self.commit_error.is_some()
            || matches!(self.outcome, Some(CommitOutcome::PushFailed { .. }))
    }

    /// Process exit code for this report.
    ///
    /// Always 0 unless `fail_on_error` is set, in which case any failure
    /// yields 1.
    pub fn exit_code(&self, fail_on_error: bool) -> i32 {
        if fail_on_error && self.has_failures() {
            1
        } else {
            0
        }
    }
}

/// Runs the test-generation pipeline over the latest commit.
pub struct Pipeline<'a, V: VersionControl + ?Sized, C: GenerationClient + ?Sized> {
    config: &'a Config,
    vcs: &'a V,
    client: &'a C,
}

impl<'a, V, C> Pipeline<'a, V, C>
where
    V: VersionControl + ?Sized,
    C: GenerationClient + ?Sized,
{
    pub fn new(config: &'a Config, vcs: &'a V, client: &'a C) -> Self {
        Self {
            config,
            vcs,
            client,
        }
    }

    /// Run once.
    ///
    /// Only a failure to list the changed files ends the run with an error.
    /// Per-file failures and commit failures are logged and recorded in the
    /// report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let changed = self.vcs.changed_files()?;
        let change_set = resolve_change_set(&changed, &self.config.languages);

        info!(
            "{} changed file(s), {} eligible for test generation ({})",
            changed.len(),
            change_set.len(),
            self.config.languages
        );

        if self.config.dry_run {
            for path in &change_set {
                info!("Would generate tests for {}", path);
            }
            return Ok(RunReport {
                change_set,
                ..RunReport::default()
            });
        }

        let mut artifacts: Vec<TestArtifact> = Vec::new();
        let mut superseded = Vec::new();
        let mut failures = Vec::new();

        for path in &change_set {
            match self.process_file(path).await {
                Ok(artifact) => {
                    info!("Generated test file for {}: {}", path, artifact.path.display());
                    if let Some(pos) = artifacts.iter().position(|a| a.path == artifact.path) {
                        let earlier = artifacts.remove(pos);
                        warn!(
                            file = %path,
                            "{} overwrote the tests generated for {}",
                            artifact.path.display(),
                            earlier.source
                        );
                        superseded.push(earlier);
                    }
                    artifacts.push(artifact);
                }
                Err(e) => {
                    error!(
                        file = %path,
                        kind = e.kind(),
                        "Error generating tests for {}: {}",
                        path,
                        e
                    );
                    failures.push(FileFailure {
                        path: path.clone(),
                        error: e,
                    });
                }
            }
        }

        let mut report = RunReport {
            change_set,
            artifacts,
            superseded,
            failures,
            ..RunReport::default()
        };

        if report.artifacts.is_empty() {
            info!("No test files to commit");
            return Ok(report);
        }

        let context = self.vcs.trigger_context();
        match coordinate(self.vcs, &report.artifacts, &context) {
            Ok(outcome) => {
                info!("Commit step finished: {}", outcome);
                report.outcome = Some(outcome);
            }
            Err(e) => {
                let e = PipelineError::from(e);
                error!(kind = e.kind(), "Failed to commit generated tests: {}", e);
                report.commit_error = Some(e);
            }
        }

        Ok(report)
    }

    /// Generate and write the test file for one source file.
    async fn process_file(&self, path: &str) -> Result<TestArtifact, PipelineError> {
        let root = self.config.repo_path.as_path();
        let source = read_source(root, path)?;

        let request = build_request(path, &source, &self.config.languages)?;
        let raw = self.client.generate(&request).await?;

        let normalized = normalize(&raw);
        if normalized.ignored_blocks > 0 {
            warn!(
                file = %path,
                "Response had {} extra code block(s); using the first",
                normalized.ignored_blocks
            );
        }
        if normalized.extraction == Extraction::BareText && raw.contains("```") {
            warn!(file = %path, "Response had an unterminated code fence; using raw text");
        }
        if normalized.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }

        let artifact = write_artifact(root, path, request.language, &normalized.code)?;
        Ok(artifact)
    }
}

fn read_source(root: &Path, path: &str) -> Result<String, PipelineError> {
    std::fs::read_to_string(root.join(path)).map_err(PipelineError::ReadFailed)
}
