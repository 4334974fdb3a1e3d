//! # Configuration
//!
//! Application settings read from an optional TOML file and then overridden
//! by environment variables.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file from `--config` or `GRADEMASTER_CONFIG`
//! 3. Environment variables:
//!    - `GRADEMASTER_HOST`, `GRADEMASTER_PORT`
//!    - `GRADEMASTER_CORS_ORIGINS`: comma-separated origins, or "*" for all
//!    - `GRADEMASTER_RATE_LIMIT`: requests per second, 0 disables
//!    - `GRADEMASTER_ADVISOR_URL`, `GRADEMASTER_ADVISOR_KEY`
//!    - `GRADEMASTER_SEED_SAMPLE`: `true`/`false`
//!
//! ## Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors_origins = ["http://localhost:5173"]
//! rate_limit = 50
//!
//! [advisor]
//! url = "http://localhost:9000/advice"
//! timeout_secs = 20
//!
//! [gradebook]
//! seed_sample = false
//! courses = ["courses/year12-it.toml"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GRADEMASTER_CONFIG";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT: u32 = 100;
const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` means localhost only; `["*"]` allows all.
    pub cors_origins: Option<Vec<String>>,
    /// Requests per second across all clients. 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Advisory collaborator settings. Without a URL the advisor is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: DEFAULT_ADVISOR_TIMEOUT_SECS,
        }
    }
}

/// Initial gradebook contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradebookConfig {
    /// Seed the sample Esports course at startup.
    pub seed_sample: bool,
    /// Course files (TOML or JSON) imported at startup.
    pub courses: Vec<PathBuf>,
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            seed_sample: true,
            courses: Vec::new(),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub advisor: AdvisorConfig,
    pub gradebook: GradebookConfig,
}

impl AppConfig {
    /// Load from the given file (or `GRADEMASTER_CONFIG`), then apply the
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty());
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| from_env.map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Relative course paths are resolved against the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dir) = path.parent() {
            for course in &mut config.gradebook.courses {
                if course.is_relative() {
                    *course = dir.join(&*course);
                }
            }
        }
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("GRADEMASTER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("GRADEMASTER_PORT") {
            self.server.port = parse_value("GRADEMASTER_PORT", &port)?;
        }
        if let Some(origins) = get("GRADEMASTER_CORS_ORIGINS") {
            self.server.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        if let Some(limit) = get("GRADEMASTER_RATE_LIMIT") {
            self.server.rate_limit = parse_value("GRADEMASTER_RATE_LIMIT", &limit)?;
        }
        if let Some(url) = get("GRADEMASTER_ADVISOR_URL") {
            self.advisor.url = Some(url);
        }
        if let Some(key) = get("GRADEMASTER_ADVISOR_KEY") {
            self.advisor.api_key = Some(key);
        }
        if let Some(seed) = get("GRADEMASTER_SEED_SAMPLE") {
            self.gradebook.seed_sample = parse_value("GRADEMASTER_SEED_SAMPLE", &seed)?;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

// =============================================================================
// TESTS
// =============================================================================
