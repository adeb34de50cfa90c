//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::{CommentStore, FileStore, MemoryStore, Storage, StorageResult, DEFAULT_KEY_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which storage backend to attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON file per post under `data_dir`
    File,
    /// In-process only, lost on exit
    Memory,
    /// No persistence: reads are empty, writes are dropped
    None,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            "none" => Ok(BackendKind::None),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Comment storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_backend() -> BackendKind {
    BackendKind::File
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("blog-comments").to_string_lossy().to_string())
        .unwrap_or_else(|| "./blog_comments_data".to_string())
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl StorageConfig {
    /// Build the configured storage capability
    pub fn open_storage(&self) -> StorageResult<Storage> {
        Ok(match self.backend {
            BackendKind::File => Storage::available(FileStore::open(self.data_path())?),
            BackendKind::Memory => Storage::available(MemoryStore::new()),
            BackendKind::None => Storage::Unavailable,
        })
    }

    /// `data_dir` with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }

    /// Build a comment store over the configured backend
    pub fn open_store(&self) -> StorageResult<CommentStore> {
        Ok(CommentStore::with_prefix(
            self.open_storage()?,
            self.key_prefix.clone(),
        ))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first config file that exists wins. A file that exists but cannot
    /// be read or parsed is an error rather than a silent fallback.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("blog-comments").join("config.toml")),
            Some(PathBuf::from("/etc/blog-comments/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file in `paths`, or env-only defaults if none exist
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Storage overrides
        if let Ok(backend) = std::env::var("BLOG_COMMENTS_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.storage.backend = kind,
                Err(e) => tracing::warn!("Ignoring BLOG_COMMENTS_BACKEND: {}", e),
            }
        }
        if let Ok(data_dir) = std::env::var("BLOG_COMMENTS_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Ok(prefix) = std::env::var("BLOG_COMMENTS_KEY_PREFIX") {
            self.storage.key_prefix = prefix;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("BLOG_COMMENTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BLOG_COMMENTS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Blog Comments Configuration
#
# Environment variables override these settings:
# - BLOG_COMMENTS_BACKEND
# - BLOG_COMMENTS_DATA_DIR
# - BLOG_COMMENTS_KEY_PREFIX
# - BLOG_COMMENTS_LOG_LEVEL
# - BLOG_COMMENTS_LOG_FORMAT

[storage]
# Backend: file, memory, or none (reads empty, writes dropped)
backend = "file"

# Directory holding one JSON file per post
data_dir = "~/.local/share/blog-comments"

# Storage keys are <key_prefix><post id>
key_prefix = "blog-comments-"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
