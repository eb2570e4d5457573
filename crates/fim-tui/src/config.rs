// Configuration loading and validation (config/fim-draft.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use fim_client::{CachePolicy, RetryPolicy};
use serde::Deserialize;
use thiserror::Error;

/// File name under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "fim-draft.toml";

/// Built-in defaults, written out when no `defaults/` directory is around.
const EMBEDDED_DEFAULTS: &str = include_str!("../defaults/fim-draft.toml");

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DraftConfig {
    /// Draft opened when none is passed on the command line.
    #[serde(default)]
    pub draft_id: Option<u32>,
    /// Pick refresh period; 0 disables auto-refresh.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_fresh_secs")]
    pub fresh_secs: u64,
    #[serde(default = "default_epa_fresh_secs")]
    pub epa_fresh_secs: u64,
    #[serde(default = "default_gc_secs")]
    pub gc_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// `None` retries until the server answers.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_refresh_interval_secs() -> u64 {
    10
}

fn default_fresh_secs() -> u64 {
    300
}

fn default_epa_fresh_secs() -> u64 {
    86_400
}

fn default_gc_secs() -> u64 {
    172_800
}

fn default_delay_ms() -> u64 {
    3000
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            draft_id: None,
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            fresh_secs: default_fresh_secs(),
            epa_fresh_secs: default_epa_fresh_secs(),
            gc_secs: default_gc_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            delay_ms: default_delay_ms(),
            max_attempts: None,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.draft.refresh_interval_secs)
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            fresh: Duration::from_secs(self.cache.fresh_secs),
            epa_fresh: Duration::from_secs(self.cache.epa_fresh_secs),
            gc: Duration::from_secs(self.cache.gc_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry.max_attempts,
            delay: Duration::from_millis(self.retry.delay_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/fim-draft.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&path, &text)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(path: &Path, text: &str) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Ensure config files exist under `base_dir/config/`.
///
/// Missing files are copied from `base_dir/defaults/` (skipping `.example`
/// templates). With no `defaults/` directory the built-in defaults are
/// written instead. Existing files are never overwritten. Returns the files
/// created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut created = Vec::new();

    if defaults_dir.is_dir() {
        let entries =
            std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read defaults directory: {e}"),
            })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read defaults entry: {e}"),
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
                continue;
            }
            let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            let target = config_dir.join(file_name);
            if write_new(&target, &content)? {
                created.push(target);
            }
        }
    }

    let target = config_dir.join(CONFIG_FILE);
    if write_new(&target, EMBEDDED_DEFAULTS.as_bytes())? {
        created.push(target);
    }

    Ok(created)
}

/// Write `content` to `target` unless it already exists. Returns whether the
/// file was created.
fn write_new(target: &Path, content: &[u8]) -> Result<bool, ConfigError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Directory config is loaded relative to.
///
/// The working directory when it has a `config/` or `defaults/` directory,
/// otherwise the per-user directory from `directories`.
pub fn resolve_base_dir(cwd: &Path) -> PathBuf {
    if cwd.join("config").is_dir() || cwd.join("defaults").is_dir() {
        return cwd.to_path_buf();
    }
    directories::ProjectDirs::from("com", "fantasyfim", "fim-draft")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Load config from the resolved base directory, creating it from defaults
/// first when needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    let base_dir = resolve_base_dir(&cwd);
    ensure_config_files(&base_dir)?;
    load_config_from(&base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must start with http:// or https://, got {base_url:?}"),
        });
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.draft.draft_id == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "draft.draft_id".into(),
            message: "must be a positive draft id".into(),
        });
    }

    let cache = &config.cache;
    let longest = cache.fresh_secs.max(cache.epa_fresh_secs);
    if cache.gc_secs < longest {
        return Err(ConfigError::ValidationError {
            field: "cache.gc_secs".into(),
            message: format!(
                "must be at least the longest freshness window ({longest}), got {}",
                cache.gc_secs
            ),
        });
    }

    if config.retry.delay_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "retry.delay_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.retry.max_attempts == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "retry.max_attempts".into(),
            message: "must be at least 1 (remove it to retry forever)".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
