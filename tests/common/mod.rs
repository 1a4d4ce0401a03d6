//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

use dokimos::{Config, LanguageSet};

/// A throwaway git repository for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// A local committer identity is configured so the `git` binary can
    /// commit without relying on global config.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file relative to the repository root, creating directories.
    pub fn write(&self, rel: &str, content: &str) {
        let full = self.path().join(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(full, content).expect("Failed to write file");
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
    }

    /// Write `files` and commit them. Returns the commit OID.
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");
        for (rel, content) in files {
            self.write(rel, content);
            index.add_path(Path::new(rel)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
        self.commit_index(message)
    }

    /// Delete `rel` from the working tree and commit the removal.
    pub fn remove_and_commit(&self, rel: &str, message: &str) -> Oid {
        std::fs::remove_file(self.path().join(rel)).expect("Failed to delete file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(rel)).expect("Failed to remove file");
        index.write().expect("Failed to write index");
        self.commit_index(message)
    }

    fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Short name of the branch HEAD points at.
    pub fn head_branch(&self) -> String {
        self.repo
            .head()
            .expect("Failed to read HEAD")
            .shorthand()
            .expect("HEAD has no shorthand")
            .to_string()
    }

    pub fn head_message(&self) -> String {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        head.message().unwrap_or_default().trim().to_string()
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }

    /// Create a bare repository and register it as `origin`, tracking the
    /// current branch. The returned directory must outlive the test.
    pub fn add_bare_remote(&self) -> tempfile::TempDir {
        let remote_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");

        let url = remote_dir.path().to_string_lossy().to_string();
        self.repo.remote("origin", &url).expect("Failed to add remote");

        let branch = self.head_branch();
        let mut config = self.repo.config().unwrap();
        config
            .set_str(&format!("branch.{}.remote", branch), "origin")
            .unwrap();
        config
            .set_str(
                &format!("branch.{}.merge", branch),
                &format!("refs/heads/{}", branch),
            )
            .unwrap();

        remote_dir
    }
}

/// A configuration rooted at `repo`, with all languages enabled.
pub fn config_for(repo: &Path) -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        languages: LanguageSet::default(),
        repo_path: PathBuf::from(repo),
        ..Config::default()
    }
}

/// Wrap `code` in a fenced block the way chat models usually reply.
pub fn fenced(label: &str, code: &str) -> String {
    format!("Here are your tests:\n\n```{}\n{}\n```\n", label, code)
}
