//! User configuration, stored in `~/.texthide/config.toml`.
//!
//! ```toml
//! min_word_len = 4
//! synonyms = "synonyms.toml"          # relative to this file
//! replace_default_synonyms = false
//!
//! [analyzer]
//! margin = 0.5
//! long_carrier_words = 300
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::AnalyzerWeights;
use crate::stego::DEFAULT_MIN_WORD_LEN;
use crate::text::synonyms::{default_table, SynonymTable, SynonymTableError};

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid synonym table {path}: {source}")]
    Synonyms {
        path: PathBuf,
        #[source]
        source: SynonymTableError,
    },
}

/// Settings shared by the library front API and the CLI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TexthideConfig {
    /// Shortest word the word-length technique treats as a content word.
    pub min_word_len: usize,

    /// Custom synonym table (TOML `[[group]]` list).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<PathBuf>,

    /// Use only the custom groups instead of adding them to the built-in set.
    pub replace_default_synonyms: bool,

    pub analyzer: AnalyzerWeights,
}

impl Default for TexthideConfig {
    fn default() -> Self {
        Self {
            min_word_len: DEFAULT_MIN_WORD_LEN,
            synonyms: None,
            replace_default_synonyms: false,
            analyzer: AnalyzerWeights::default(),
        }
    }
}

impl TexthideConfig {
    /// Loads the configuration from the default location.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Loads the configuration from an explicit file.
    ///
    /// A relative `synonyms` path is resolved against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: TexthideConfig = toml::from_str(&content)?;

        if let (Some(synonyms), Some(dir)) = (&config.synonyms, path.parent()) {
            if synonyms.is_relative() {
                config.synonyms = Some(dir.join(synonyms));
            }
        }

        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = get_config_dir()?;
        Ok(config_dir.join("config.toml"))
    }

    /// The synonym table this configuration selects.
    ///
    /// Borrows the built-in table when no custom file is set.
    pub fn synonym_table(&self) -> Result<Cow<'static, SynonymTable>, ConfigError> {
        let Some(path) = &self.synonyms else {
            return Ok(Cow::Borrowed(default_table()));
        };

        let table = if self.replace_default_synonyms {
            SynonymTable::from_file(path)
        } else {
            SynonymTable::from_file_with_defaults(path)
        }
        .map_err(|source| ConfigError::Synonyms {
            path: path.clone(),
            source,
        })?;

        debug!(
            "loaded {} synonym groups from {}",
            table.groups().len(),
            path.display()
        );
        Ok(Cow::Owned(table))
    }
}

/// Get the texthide configuration directory (`~/.texthide`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".texthide"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TexthideConfig::default();
        assert_eq!(config.min_word_len, 3);
        assert!(config.synonyms.is_none());
        assert!(matches!(config.synonym_table().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_word_len = 5\n\n[analyzer]\nmargin = 0.9\n").unwrap();

        let config = TexthideConfig::load_from(&path).unwrap();
        assert_eq!(config.min_word_len, 5);
        assert_eq!(config.analyzer.margin, 0.9);
        assert_eq!(config.analyzer.corpus, AnalyzerWeights::default().corpus);
        assert!(!config.replace_default_synonyms);
    }

    #[test]
    fn test_relative_synonyms_extend_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("words.toml"),
            "[[group]]\nwords = [\"azure\", \"cobalt\", \"navy\"]\n",
        )
        .unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "synonyms = \"words.toml\"\n").unwrap();

        let config = TexthideConfig::load_from(&path).unwrap();
        assert_eq!(config.synonyms, Some(dir.path().join("words.toml")));

        let table = config.synonym_table().unwrap();
        assert!(table.lookup("cobalt").unwrap().is_some());
        assert!(table.lookup("quick").unwrap().is_some());
    }

    #[test]
    fn test_replace_default_synonyms() {
        let dir = TempDir::new().unwrap();
        let words = dir.path().join("words.toml");
        fs::write(&words, "[[group]]\nwords = [\"azure\", \"cobalt\"]\n").unwrap();

        let config = TexthideConfig {
            synonyms: Some(words),
            replace_default_synonyms: true,
            ..TexthideConfig::default()
        };
        let table = config.synonym_table().unwrap();
        assert_eq!(table.groups().len(), 1);
        assert!(table.lookup("quick").unwrap().is_none());
    }

    #[test]
    fn test_invalid_synonyms_file() {
        let dir = TempDir::new().unwrap();
        let words = dir.path().join("words.toml");
        fs::write(&words, "[[group]]\nwords = [\"two words\"]\n").unwrap();

        let config = TexthideConfig {
            synonyms: Some(words),
            ..TexthideConfig::default()
        };
        assert!(matches!(
            config.synonym_table(),
            Err(ConfigError::Synonyms { .. })
        ));
    }

    #[test]
    fn test_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_word_len = \"three\"").unwrap();
        assert!(matches!(
            TexthideConfig::load_from(&path),
            Err(ConfigError::TomlParseError(_))
        ));
    }
}
