//! Writing generated tests next to their sources.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::MaterializeError;
use crate::language::Language;

/// A generated test file for exactly one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestArtifact {
    /// Repository-relative path of the source the test was generated for.
    pub source: String,
    /// Repository-relative path of the test file.
    pub path: PathBuf,
    pub content: String,
}

/// Derive the test file path for `source`.
///
/// The directory is kept and the language extension is replaced by the
/// language's test suffix and test extension:
/// `Foo.swift` → `FooTests.swift`, `Foo.swiftui` → `FooTests.swift`,
/// `Bar.kt` → `BarTest.kt`, `Baz.kts` → `BazTest.kt`.
pub fn derive_test_path(source: &str, language: Language) -> PathBuf {
    let source = Path::new(source);
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!(
        "{}{}.{}",
        stem,
        language.test_suffix(),
        language.test_extension()
    );

    match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write `code` to the derived test path under `root`, overwriting any file
/// already there.
///
/// Content goes to a temp file in the target directory and is renamed into
/// place. Missing directories are not created.
pub fn write_artifact(
    root: &Path,
    source: &str,
    language: Language,
    code: &str,
) -> Result<TestArtifact, MaterializeError> {
    let path = derive_test_path(source, language);
    let full_path = root.join(&path);

    let mut content = code.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    write_atomic(&full_path, &content).map_err(|source| MaterializeError::WriteFailed {
        path: full_path.clone(),
        source,
    })?;

    Ok(TestArtifact {
        source: source.to_string(),
        path,
        content,
    })
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
