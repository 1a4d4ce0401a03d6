//! Extraction of code from raw generation output.
//!
//! Models are told not to use markdown, but often wrap their answer in a
//! fenced block anyway. Only the first fenced block is used; responses with
//! several blocks (for example a preamble snippet followed by the tests) lose
//! everything after the first one.

use std::sync::LazyLock;

use regex_lite::Regex;

/// First fenced block: optional language tag on the opening line, then a
/// non-greedy body up to the next fence.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[\w+#.-]*[ \t]*\r?\n)?(.*?)```")
        .expect("fenced block pattern is valid")
});

/// How the code was found in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Taken from the first fenced block.
    FencedBlock,
    /// No complete fenced block; the whole response is the code.
    BareText,
}

/// Code ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCode {
    pub code: String,
    pub extraction: Extraction,
    /// Fenced blocks after the first one that were dropped.
    pub ignored_blocks: usize,
}

impl NormalizedCode {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Extract clean code from a raw response. Never fails.
pub fn normalize(raw: &str) -> NormalizedCode {
    let mut blocks = FENCED_BLOCK.captures_iter(raw);

    match blocks.next().and_then(|caps| caps.get(1)) {
        Some(body) => NormalizedCode {
            code: body.as_str().trim().to_string(),
            extraction: Extraction::FencedBlock,
            ignored_blocks: blocks.count(),
        },
        None => NormalizedCode {
            code: raw.trim().to_string(),
            extraction: Extraction::BareText,
            ignored_blocks: 0,
        },
    }
}
