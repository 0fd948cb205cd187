//! Configuration file support
//!
//! Loaded from `<config_dir>/tourgen/config.toml` unless a path is given.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tourgen_core::{ColumnBase, LanguageError, LanguageMap, StepSynthesizer};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid language mapping: {0}")]
    Language(#[from] LanguageError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Emit compact JSON instead of indented JSON
    pub compact: bool,
    /// Character convention for replacement selections
    pub column_base: ColumnBase,
    /// Globs always left out of the tour
    pub exclude: Vec<String>,
    /// Extra or overriding extension -> language mappings
    pub languages: BTreeMap<String, String>,
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tourgen").join("config.toml"))
    }

    /// Load from an explicit path, or fall back to the default location.
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Built-in languages with the configured overrides applied
    pub fn language_map(&self) -> Result<LanguageMap, ConfigError> {
        let mut languages = LanguageMap::default();
        languages.extend(self.languages.iter())?;
        Ok(languages)
    }

    pub fn synthesizer(&self) -> Result<StepSynthesizer, ConfigError> {
        Ok(StepSynthesizer::new()
            .with_languages(self.language_map()?)
            .with_column_base(self.column_base))
    }
}
