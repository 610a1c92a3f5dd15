use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Language utilities for ISO language code handling
///
/// Language codes double as directory segments under the content root, so a
/// code is kept exactly as configured (lowercased) while its primary subtag
/// (`pt` in `pt-br`) is resolved against ISO 639-1 or 639-3.
fn lookup(code: &str) -> Option<Language> {
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => None,
    }
}

/// Normalize a language code for use as a directory segment
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Check whether a code names a known language
pub fn is_valid_code(code: &str) -> bool {
    lookup(&normalize_code(code)).is_some()
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String, ConfigError> {
    lookup(&normalize_code(code))
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| ConfigError::invalid("language", code, "unknown ISO 639 language code"))
}

/// Get the language's own name for itself, falling back to the English name
pub fn get_native_name(code: &str) -> Result<String, ConfigError> {
    let lang = lookup(&normalize_code(code))
        .ok_or_else(|| ConfigError::invalid("language", code, "unknown ISO 639 language code"))?;
    Ok(lang.to_autonym().unwrap_or_else(|| lang.to_name()).to_string())
}

/// A language documents are translated into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetLanguage {
    /// Code as configured, lowercased (`en`, `ja`)
    pub code: String,
    /// English display name
    pub name: String,
    /// Autonym, used in progress output
    pub native_name: String,
    /// Directory segment under the content root
    pub dir: String,
}

impl TargetLanguage {
    /// Resolve a language from its code
    pub fn from_code(code: &str) -> Result<Self, ConfigError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(ConfigError::invalid("language", code, "empty language code"));
        }
        Ok(Self {
            name: get_language_name(&code)?,
            native_name: get_native_name(&code)?,
            dir: code.clone(),
            code,
        })
    }

    /// Root of this language's mirror of the documentation tree
    pub fn root(&self, content_root: &Path) -> PathBuf {
        content_root.join(&self.dir)
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Parse a comma-separated list of target language codes
///
/// Duplicates are dropped, the first occurrence keeps its position.
pub fn parse_language_list(list: &str) -> Result<Vec<TargetLanguage>, ConfigError> {
    let mut languages: Vec<TargetLanguage> = Vec::new();
    for code in list.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let language = TargetLanguage::from_code(code)
            .map_err(|_| ConfigError::invalid("TARGET_LANGUAGES", code, "unknown ISO 639 language code"))?;
        if !languages.iter().any(|l| l.code == language.code) {
            languages.push(language);
        }
    }

    if languages.is_empty() {
        return Err(ConfigError::invalid("TARGET_LANGUAGES", list, "at least one target language is required"));
    }
    Ok(languages)
}
