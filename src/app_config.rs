use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::language_utils::{self, TargetLanguage};

/// Application configuration module
/// This module handles the run configuration: it is read from the environment
/// once at start-up, overridden by command line flags, validated, and then
/// passed by reference to every component.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding one subdirectory per language
    pub content_root: PathBuf,

    /// Source language code; also the source directory name
    pub source_language: String,

    /// Languages to translate into
    pub target_languages: Vec<TargetLanguage>,

    /// Chat-completion provider settings
    pub provider: ProviderConfig,

    /// Retry settings for provider calls
    pub retry: RetryConfig,

    /// Maximum number of tasks run concurrently (chunk size)
    pub max_workers: usize,

    /// Retranslate everything except manual overrides
    pub force_translate: bool,

    /// Only retranslate changed documents and fill missing translations
    pub incremental_translate: bool,

    /// Version-control snapshot range
    pub vcs: VcsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    // @field: API key, never serialized
    #[serde(skip_serializing, default)]
    pub api_key: String,

    // @field: Base URL, `/chat/completions` is appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Retry configuration for provider calls
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_retry_count")]
    pub max_retries: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: f64,

    /// Multiplier applied to the delay for each further retry
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_retry_count(),
            retry_delay_secs: default_retry_delay_secs(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

/// Revisions compared by the change detector
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VcsConfig {
    /// Older snapshot of the manual-override diff
    #[serde(default = "default_diff_base")]
    pub diff_base: String,

    /// Newer snapshot; also the baseline for source changes
    #[serde(default = "default_diff_head")]
    pub diff_head: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            diff_base: default_diff_base(),
            diff_head: default_diff_head(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::invalid("LOG_LEVEL", s, "expected error, warn, info, debug or trace")),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content").join("docs")
}

fn default_source_language() -> String {
    "zh".to_string()
}

fn default_target_languages() -> &'static str {
    "en,ja"
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_secs() -> f64 {
    2.0
}

fn default_retry_backoff() -> f64 {
    2.0
}

fn default_max_workers() -> usize {
    3
}

fn default_diff_base() -> String {
    "HEAD~1".to_string()
}

fn default_diff_head() -> String {
    "HEAD".to_string()
}

/// Parse an optional numeric option, falling back to a default when unset
fn parse_option<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::invalid(key, raw, "not a valid number")),
        None => Ok(default),
    }
}

impl Config {
    /// Build and validate the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the process environment without validating the result
    ///
    /// Used when command line overrides still have to be applied.
    pub fn from_env_unvalidated() -> Result<Self, ConfigError> {
        Self::from_lookup_unvalidated(|key| std::env::var(key).ok())
    }

    /// Build and validate the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self::from_lookup_unvalidated(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse every option from `lookup` without the consistency checks
    ///
    /// The API key is checked before anything else so a missing credential
    /// is always the reported error. Malformed values still fail here.
    pub fn from_lookup_unvalidated(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY").unwrap_or_default().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = ProviderConfig {
            api_key,
            endpoint: non_empty("OPENAI_BASE_URL").unwrap_or_else(default_endpoint),
            model: non_empty("OPENAI_MODEL").unwrap_or_else(default_model),
            timeout_secs: parse_option(&lookup, "REQUEST_TIMEOUT_SECS", default_timeout_secs())?,
            temperature: default_temperature(),
        };

        let retry = RetryConfig {
            max_retries: parse_option(&lookup, "MAX_RETRIES", default_retry_count())?,
            retry_delay_secs: parse_option(&lookup, "RETRY_DELAY", default_retry_delay_secs())?,
            retry_backoff: parse_option(&lookup, "RETRY_BACKOFF", default_retry_backoff())?,
        };

        let target_languages = language_utils::parse_language_list(
            &non_empty("TARGET_LANGUAGES").unwrap_or_else(|| default_target_languages().to_string()),
        )?;

        let log_level = match non_empty("LOG_LEVEL") {
            Some(level) => level.parse()?,
            None => LogLevel::default(),
        };

        Ok(Self {
            content_root: non_empty("DOCS_DIR").map(PathBuf::from).unwrap_or_else(default_content_root),
            source_language: non_empty("SOURCE_LANGUAGE")
                .map(|code| language_utils::normalize_code(&code))
                .unwrap_or_else(default_source_language),
            target_languages,
            provider,
            retry,
            max_workers: parse_option(&lookup, "MAX_WORKERS", default_max_workers())?,
            force_translate: lookup("FORCE_TRANSLATE")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            incremental_translate: !lookup("INCREMENTAL_TRANSLATE")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("false")),
            vcs: VcsConfig {
                diff_base: non_empty("VCS_DIFF_BASE").unwrap_or_else(default_diff_base),
                diff_head: non_empty("VCS_DIFF_HEAD").unwrap_or_else(default_diff_head),
            },
            log_level,
        })
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let url = Url::parse(&self.provider.endpoint)
            .map_err(|e| ConfigError::invalid("OPENAI_BASE_URL", &self.provider.endpoint, e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::invalid("OPENAI_BASE_URL", &self.provider.endpoint, "expected an http(s) URL"));
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::invalid("OPENAI_MODEL", "", "model name cannot be empty"));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::invalid("REQUEST_TIMEOUT_SECS", "0", "timeout must be positive"));
        }

        if self.max_workers == 0 {
            return Err(ConfigError::invalid("MAX_WORKERS", "0", "at least one worker is required"));
        }

        let delay = self.retry.retry_delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::invalid("RETRY_DELAY", delay.to_string(), "delay must be a non-negative number"));
        }

        let backoff = self.retry.retry_backoff;
        if !backoff.is_finite() || backoff < 1.0 {
            return Err(ConfigError::invalid("RETRY_BACKOFF", backoff.to_string(), "backoff must be at least 1.0"));
        }

        if !language_utils::is_valid_code(&self.source_language) {
            return Err(ConfigError::invalid("SOURCE_LANGUAGE", &self.source_language, "unknown ISO 639 language code"));
        }

        if self.target_languages.is_empty() {
            return Err(ConfigError::invalid("TARGET_LANGUAGES", "", "at least one target language is required"));
        }

        if let Some(lang) = self.target_languages.iter().find(|l| l.dir == self.source_language) {
            return Err(ConfigError::invalid("TARGET_LANGUAGES", &lang.code, "target language equals the source language"));
        }

        Ok(())
    }

    /// Make the content root absolute against the given working directory
    pub fn resolve_paths(&mut self, working_dir: &Path) {
        self.content_root = FileManager::absolutize(&self.content_root, working_dir);
    }

    /// Root of the source-language tree
    pub fn source_root(&self) -> PathBuf {
        self.content_root.join(&self.source_language)
    }

    /// Roots of every target-language tree
    pub fn target_roots(&self) -> Vec<PathBuf> {
        self.target_languages
            .iter()
            .map(|lang| lang.root(&self.content_root))
            .collect()
    }

    /// Display name of the source language, or its code when unknown
    pub fn source_language_name(&self) -> String {
        language_utils::get_language_name(&self.source_language)
            .unwrap_or_else(|_| self.source_language.clone())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            content_root: default_content_root(),
            source_language: default_source_language(),
            target_languages: language_utils::parse_language_list(default_target_languages())
                .unwrap_or_default(),
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            max_workers: default_max_workers(),
            force_translate: false,
            incremental_translate: true,
            vcs: VcsConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
