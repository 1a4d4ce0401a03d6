//! Run configuration, read once from the environment.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::language::LanguageSet;

/// Environment variable holding the generation service credential.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
/// Comma-separated list of enabled language tags.
pub const LANGUAGES_ENV_VAR: &str = "LANGUAGES";
/// Model identifier sent with each request.
pub const MODEL_ENV_VAR: &str = "MODEL";
/// Base URL of the chat-completions API.
pub const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
/// CI event that triggered the run.
pub const EVENT_ENV_VAR: &str = "GITHUB_EVENT_NAME";

pub const DEFAULT_LANGUAGES: &str = "swift,kotlin";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Everything a pipeline run needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub languages: LanguageSet,
    pub model: String,
    pub base_url: String,
    pub event_name: Option<String>,
    pub repo_path: PathBuf,
    pub dry_run: bool,
    pub fail_on_error: bool,
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(API_KEY_ENV_VAR),
            languages: LanguageSet::parse(
                &non_empty_var(LANGUAGES_ENV_VAR).unwrap_or_else(|| DEFAULT_LANGUAGES.to_string()),
            ),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty_var(BASE_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            event_name: non_empty_var(EVENT_ENV_VAR),
            repo_path: PathBuf::from("."),
            dry_run: false,
            fail_on_error: false,
        }
    }

    /// Check the configuration is usable for a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguagesEnabled);
        }
        if !self.dry_run && self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    /// The credential, or an error when it is missing.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            languages: LanguageSet::default(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            event_name: None,
            repo_path: PathBuf::from("."),
            dry_run: false,
            fail_on_error: false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
