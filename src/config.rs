//! Configuration file handling for handle.
//!
//! Loads configuration from `~/.config/handle/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::gesture::DEFAULT_CONFIRM_NAMES;

/// Configuration file structure for handle.
/// Loaded from ~/.config/handle/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub words: WordsConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct GestureConfig {
    /// Hold time before a gesture is accepted, in milliseconds.
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
    /// Gestures scoring below this are ignored. Unset means no floor.
    ///
    /// Scores are on whatever scale the external classifier uses, so there is
    /// no safe built-in value. A fingerpose classifier (0-10) is usually run
    /// with 6.5; many classifiers already apply their own floor before
    /// emitting a label.
    #[serde(default)]
    pub min_score: Option<f32>,
    /// Classifier labels that mean "confirm".
    #[serde(default = "default_confirm_names")]
    pub confirm_names: Vec<String>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dwell_ms: default_dwell_ms(),
            min_score: None,
            confirm_names: default_confirm_names(),
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub auto_submit: bool,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct WordsConfig {
    /// Fixed target word for every round.
    #[serde(default)]
    pub target: Option<String>,
    /// Candidate target words; the built-in list is used when empty.
    #[serde(default)]
    pub list: Vec<String>,
    /// Base URL of the random word API used with --online.
    #[serde(default)]
    pub api_url: Option<String>,
}

fn default_dwell_ms() -> u64 {
    3000
}

fn default_confirm_names() -> Vec<String> {
    DEFAULT_CONFIRM_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user named explicitly.
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Self::load(Some(path))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    NotFound {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound { path } => {
                write!(f, "Config file '{}' not found", path.display())
            }
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NotFound { .. } => None,
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("handle").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/handle/config.toml")
        })
}

/// Contents written by `handle config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# handle configuration

[gestures]
# How long a gesture must be held before it counts (milliseconds)
dwell_ms = 3000
# Ignore gestures scoring below this. Off by default because the scale
# depends on your classifier, and most classifiers already drop weak matches
# before emitting a label. For fingerpose (scores 0-10) use 6.5:
# min_score = 6.5
# Classifier labels for the confirm (submit) gesture
confirm_names = ["👍", "thumbs_up", "confirm"]

[game]
# Submit as soon as the fifth letter is accepted
auto_submit = false

[words]
# Fixed target word (practice mode)
# target = "APPLE"
# Target words to pick from; built-in list when empty
list = []
# Random word API used with --online
# api_url = "https://random-word-api.herokuapp.com"
"#;
