//! Language classification by file extension.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use tracing::warn;

/// Languages dokimos can generate tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Swift,
    Kotlin,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Swift, Language::Kotlin];

    /// Tag used in the `LANGUAGES` setting.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
        }
    }

    /// Source extensions (without the dot) belonging to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Swift => &["swift", "swiftui"],
            Language::Kotlin => &["kt", "kts"],
        }
    }

    /// Suffix appended to the file stem of a generated test.
    pub fn test_suffix(&self) -> &'static str {
        match self {
            Language::Swift => "Tests",
            Language::Kotlin => "Test",
        }
    }

    /// Extension of generated test files.
    pub fn test_extension(&self) -> &'static str {
        match self {
            Language::Swift => "swift",
            Language::Kotlin => "kt",
        }
    }

    /// Label for fenced code blocks in prompts.
    pub fn fence_label(&self) -> &'static str {
        self.tag()
    }

    /// Classify a path by its extension. Matching is case-sensitive.
    pub fn from_path(path: &str) -> Option<Language> {
        let ext = Path::new(path).extension()?.to_str()?;
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }

    fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|lang| lang.tag() == tag)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Swift => f.write_str("Swift"),
            Language::Kotlin => f.write_str("Kotlin"),
        }
    }
}

/// The set of languages enabled for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet(BTreeSet<Language>);

impl LanguageSet {
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        Self(languages.into_iter().collect())
    }

    /// Parse a comma-separated tag list such as `swift,kotlin`.
    ///
    /// Unknown tags are skipped with a warning.
    pub fn parse(list: &str) -> Self {
        let mut set = BTreeSet::new();
        for raw in list.split(',') {
            let tag = raw.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            match Language::from_tag(&tag) {
                Some(lang) => {
                    set.insert(lang);
                }
                None => warn!("Ignoring unknown language '{}'", tag),
            }
        }
        Self(set)
    }

    pub fn contains(&self, language: Language) -> bool {
        self.0.contains(&language)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.iter().copied()
    }

    /// Classify `path` and return its language only if it is enabled.
    pub fn classify(&self, path: &str) -> Option<Language> {
        Language::from_path(path).filter(|lang| self.contains(*lang))
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::new(Language::ALL)
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.iter().map(|l| l.tag()).collect();
        f.write_str(&tags.join(","))
    }
}
