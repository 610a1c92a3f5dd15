/*!
 * Tests for application configuration functionality
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use doctrans::app_config::{Config, LogLevel};
use doctrans::errors::ConfigError;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

/// Test defaults when only the API key is set
#[test]
fn test_from_lookup_withOnlyApiKey_shouldUseDefaults() {
    let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

    assert_eq!(config.provider.api_key, "sk-test");
    assert_eq!(config.provider.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.provider.model, "gemini-2.5-flash");
    assert_eq!(config.provider.timeout_secs, 120);
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.retry_delay_secs, 2.0);
    assert_eq!(config.retry.retry_backoff, 2.0);
    assert_eq!(config.max_workers, 3);
    assert!(!config.force_translate);
    assert!(config.incremental_translate);
    assert_eq!(config.content_root, PathBuf::from("content/docs"));
    assert_eq!(config.source_language, "zh");
    let codes: Vec<&str> = config.target_languages.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["en", "ja"]);
    assert_eq!(config.vcs.diff_base, "HEAD~1");
    assert_eq!(config.vcs.diff_head, "HEAD");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a missing key wins over every other problem
#[test]
fn test_from_lookup_withMissingApiKey_shouldFailFirst() {
    let result = Config::from_lookup(lookup_from(&[("MAX_WORKERS", "zero"), ("OPENAI_BASE_URL", "nope")]));
    assert_eq!(result.unwrap_err(), ConfigError::MissingApiKey);

    let blank = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")]));
    assert_eq!(blank.unwrap_err(), ConfigError::MissingApiKey);
}

/// Test that every option is read from the environment
#[test]
fn test_from_lookup_withAllOptions_shouldOverrideDefaults() {
    let config = Config::from_lookup(lookup_from(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ("OPENAI_MODEL", "gpt-4o-mini"),
        ("MAX_RETRIES", "5"),
        ("RETRY_DELAY", "0.5"),
        ("RETRY_BACKOFF", "1.5"),
        ("MAX_WORKERS", "8"),
        ("FORCE_TRANSLATE", "TRUE"),
        ("INCREMENTAL_TRANSLATE", "False"),
        ("DOCS_DIR", "site/docs"),
        ("SOURCE_LANGUAGE", "EN"),
        ("TARGET_LANGUAGES", "fr, de ,fr"),
        ("REQUEST_TIMEOUT_SECS", "30"),
        ("LOG_LEVEL", "debug"),
    ]))
    .unwrap();

    assert_eq!(config.provider.endpoint, "http://localhost:8080/v1");
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.retry_delay_secs, 0.5);
    assert_eq!(config.retry.retry_backoff, 1.5);
    assert_eq!(config.max_workers, 8);
    assert!(config.force_translate);
    assert!(!config.incremental_translate);
    assert_eq!(config.content_root, PathBuf::from("site/docs"));
    assert_eq!(config.source_language, "en");
    let codes: Vec<&str> = config.target_languages.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["fr", "de"]);
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test the boolean flag parsing rules
#[test]
fn test_from_lookup_withNonCanonicalFlags_shouldKeepDefaults() {
    let config = Config::from_lookup(lookup_from(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("FORCE_TRANSLATE", "yes"),
        ("INCREMENTAL_TRANSLATE", "0"),
    ]))
    .unwrap();

    assert!(!config.force_translate);
    assert!(config.incremental_translate);
}

/// Test rejection of unusable values
#[test]
fn test_from_lookup_withInvalidValues_shouldReturnInvalidValue() {
    let cases = [
        ("MAX_WORKERS", "0"),
        ("MAX_WORKERS", "many"),
        ("MAX_RETRIES", "-1"),
        ("RETRY_DELAY", "-2"),
        ("RETRY_BACKOFF", "0.5"),
        ("OPENAI_BASE_URL", "not a url"),
        ("OPENAI_BASE_URL", "ftp://example.com"),
        ("TARGET_LANGUAGES", "en,xx"),
        ("TARGET_LANGUAGES", "zh"),
        ("SOURCE_LANGUAGE", "qq"),
        ("LOG_LEVEL", "loud"),
        ("REQUEST_TIMEOUT_SECS", "0"),
    ];

    for (key, value) in cases {
        let result = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test"), (key, value)]));
        match result {
            Err(ConfigError::InvalidValue { key: reported, .. }) => assert_eq!(reported, key, "{}={}", key, value),
            other => panic!("{}={} should be rejected, got {:?}", key, value, other),
        }
    }
}

/// Test that an override can repair an environment value before validation
#[test]
fn test_from_lookup_unvalidated_withZeroWorkersThenOverride_shouldValidate() {
    let lookup = lookup_from(&[("OPENAI_API_KEY", "sk-test"), ("MAX_WORKERS", "0")]);
    let mut config = Config::from_lookup_unvalidated(&lookup).unwrap();
    assert_eq!(config.max_workers, 0);
    assert!(config.validate().is_err());

    config.max_workers = 2;
    assert!(config.validate().is_ok());

    // Missing key and malformed numbers still fail while reading
    let missing = Config::from_lookup_unvalidated(lookup_from(&[("MAX_WORKERS", "many")]));
    assert!(matches!(missing, Err(ConfigError::MissingApiKey)));
    let malformed = Config::from_lookup_unvalidated(lookup_from(&[("OPENAI_API_KEY", "sk-test"), ("MAX_WORKERS", "many")]));
    assert!(matches!(malformed, Err(ConfigError::InvalidValue { .. })));
}

/// Test path helpers after resolving against a working directory
#[test]
fn test_resolve_paths_withRelativeRoot_shouldDeriveLanguageRoots() {
    let mut config = Config::from_lookup(lookup_from(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("DOCS_DIR", "./content/../content/docs"),
    ]))
    .unwrap();
    config.resolve_paths(Path::new("/work/site"));

    assert_eq!(config.content_root, PathBuf::from("/work/site/content/docs"));
    assert_eq!(config.source_root(), PathBuf::from("/work/site/content/docs/zh"));
    assert_eq!(
        config.target_roots(),
        vec![PathBuf::from("/work/site/content/docs/en"), PathBuf::from("/work/site/content/docs/ja")]
    );
    assert_eq!(config.source_language_name(), "Chinese");
}

/// Test that the API key never ends up in serialized output
#[test]
fn test_serialize_shouldOmitApiKey() {
    let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
    let json = serde_json::to_string(&config).unwrap();

    assert!(!json.contains("sk-secret"));
    assert!(json.contains("gemini-2.5-flash"));
}

/// Test log level parsing
#[test]
fn test_log_level_fromStr_shouldAcceptKnownNames() {
    assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert!("verbose".parse::<LogLevel>().is_err());
}
