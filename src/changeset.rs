//! Selection of changed files eligible for test generation.

use std::collections::HashSet;
use std::path::Path;

use crate::language::LanguageSet;

/// Extensions a generated test file can carry.
const TEST_EXTENSIONS: [&str; 2] = ["swift", "kt"];

/// Stem suffixes that mark a file as a test.
const TEST_SUFFIXES: [&str; 2] = ["Tests", "Test"];

/// Whether `path` looks like a test file (e.g. `FooTests.swift`, `BarTest.kt`).
///
/// Matches the naming produced by [`crate::materialize::derive_test_path`].
pub fn is_generated_test(path: &str) -> bool {
    let path = Path::new(path);
    let (Some(stem), Some(ext)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) else {
        return false;
    };

    TEST_EXTENSIONS.contains(&ext) && TEST_SUFFIXES.iter().any(|s| stem.ends_with(s))
}

/// Filter the files changed by a commit down to the change set.
///
/// Keeps the input order and drops duplicates.
pub fn resolve_change_set(changed: &[String], enabled: &LanguageSet) -> Vec<String> {
    let mut seen = HashSet::new();
    changed
        .iter()
        .filter(|path| !path.is_empty())
        .filter(|path| enabled.classify(path).is_some())
        .filter(|path| !is_generated_test(path))
        .filter(|path| seen.insert(path.as_str()))
        .cloned()
        .collect()
}
