//! Front-end configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::text::symbols::Language;

/// Configuration for [`crate::TtsFrontend`].
///
/// All fields have defaults, so a partial JSON document is enough:
///
/// ```json
/// { "language": "EN", "data_dir": "ov_models" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Directory holding `opencpop-strict.txt` and `cmudict_cache.txt`.
    pub data_dir: PathBuf,
    /// Language name, `"ZH"` (Mandarin with embedded English) or `"EN"`.
    pub language: String,
    /// Minimum visible length of a merged sentence piece.
    pub min_sentence_len: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            language: "ZH".to_string(),
            min_sentence_len: 10,
        }
    }
}

impl FrontendConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Parse the configured language name.
    pub fn language(&self) -> Result<Language> {
        Language::parse(&self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FrontendConfig::default();
        assert_eq!(config.language().unwrap(), Language::Zh);
        assert_eq!(config.min_sentence_len, 10);
    }

    #[test]
    fn partial_json() {
        let config: FrontendConfig = serde_json::from_str(r#"{"language": "EN"}"#).unwrap();
        assert_eq!(config.language().unwrap(), Language::En);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn unknown_language_rejected() {
        let config: FrontendConfig = serde_json::from_str(r#"{"language": "FR"}"#).unwrap();
        assert!(config.language().is_err());
    }
}
