//! Prompt construction for test generation.

use crate::error::GenerationError;
use crate::language::{Language, LanguageSet};

/// System role instruction shared by every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a code generator that outputs only valid code with no explanations or markdown. Your output should be ready to use in an IDE without any modifications.";

/// A request for one source file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub language: Language,
    pub system_instruction: String,
    pub user_prompt: String,
}

/// Build the generation request for `path`.
///
/// `path` is only used to classify the language; the caller supplies the
/// file content. The language must be both recognized and enabled.
pub fn build_request(
    path: &str,
    source: &str,
    enabled: &LanguageSet,
) -> Result<GenerationRequest, GenerationError> {
    let language = enabled
        .classify(path)
        .ok_or_else(|| GenerationError::UnsupportedLanguage(path.to_string()))?;

    let user_prompt = format!(
        "{instructions}\n\nSource code:\n```{label}\n{source}\n```\n",
        instructions = instructions_for(language),
        label = language.fence_label(),
    );

    Ok(GenerationRequest {
        language,
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_prompt,
    })
}

fn instructions_for(language: Language) -> &'static str {
    match language {
        Language::Swift => {
            "Generate comprehensive unit tests for this Swift/SwiftUI code.
Use the XCTest framework. Cover different scenarios, edge cases,
and potential error conditions.

IMPORTANT: Return ONLY the Swift code for the tests, with no explanations or markdown formatting.
Start your response with 'import XCTest' and include only valid Swift code."
        }
        Language::Kotlin => {
            "Generate comprehensive unit tests for this Kotlin code.
Use JUnit 5 for testing. Cover different scenarios, edge cases,
and potential error conditions. Use Kotlin's testing idioms.

IMPORTANT: Return ONLY the Kotlin code for the tests, with no explanations or markdown formatting.
Start your response with appropriate import statements and include only valid Kotlin code."
        }
    }
}
