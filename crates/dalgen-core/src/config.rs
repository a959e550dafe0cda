//! Configuration schema (dalgen.toml)

use dalgen_naming::{Naming, NamingError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the primary dictionary path
pub const DICTIONARY_ENV: &str = "DALGEN_DICTIONARY";

/// Environment variable overriding the supplementary dictionary path
pub const BIG_DICTIONARY_ENV: &str = "DALGEN_BIG_DICTIONARY";

/// Dictionary locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// General purpose word list
    pub primary: PathBuf,

    /// Domain word list consulted first
    pub supplementary: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("dictionary.txt"),
            supplementary: PathBuf::from("bigworddictionary.txt"),
        }
    }
}

impl DictionaryConfig {
    /// Resolve both paths against `root` when relative
    pub fn resolve(&self, root: &Path) -> (PathBuf, PathBuf) {
        (root.join(&self.primary), root.join(&self.supplementary))
    }

    /// Load both dictionaries and build the naming engine
    pub fn load_naming(&self, root: &Path) -> Result<Naming, NamingError> {
        let (primary, supplementary) = self.resolve(root);
        Naming::load(primary, supplementary)
    }
}

/// Definition document output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Write tab-indented JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dictionary locations
    #[serde(default)]
    pub dictionaries: DictionaryConfig,

    /// Document settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionaries: DictionaryConfig::default(),
            document: DocumentConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Apply dictionary overrides from the environment
    ///
    /// Relative override paths are taken from the current directory, not
    /// from the project root.
    pub fn apply_env(&mut self) {
        let cwd = std::env::current_dir().unwrap_or_default();
        self.apply_overrides(
            &cwd,
            std::env::var_os(DICTIONARY_ENV).map(PathBuf::from),
            std::env::var_os(BIG_DICTIONARY_ENV).map(PathBuf::from),
        );
    }

    fn apply_overrides(
        &mut self,
        cwd: &Path,
        primary: Option<PathBuf>,
        supplementary: Option<PathBuf>,
    ) {
        if let Some(primary) = primary {
            self.dictionaries.primary = cwd.join(primary);
        }
        if let Some(supplementary) = supplementary {
            self.dictionaries.supplementary = cwd.join(supplementary);
        }
    }

    /// Build the naming engine from the configured dictionaries
    pub fn load_naming(&self) -> Result<Naming, NamingError> {
        self.dictionaries.load_naming(&self.project_root)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
