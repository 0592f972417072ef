use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::interface_adapters::storage::FileStorage;
use crate::use_cases::polling::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const CONFIG_PATH_VAR: &str = "RIDE_CLIENT_CONFIG";
pub const BASE_URL_VAR: &str = "RIDE_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "RIDE_API_TIMEOUT_MS";
pub const POLL_INTERVAL_VAR: &str = "RIDE_POLL_INTERVAL_SECS";
pub const SESSION_FILE_VAR: &str = "RIDE_SESSION_FILE";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

// Only `json` selects structured output; anything else stays compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        if value.trim() == "json" {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings for the client.
///
/// `storage_path` is `None` only when the platform has no data directory and
/// nothing was configured; the session is then kept in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub storage_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            storage_path: FileStorage::default_path(),
            log_format: LogFormat::default(),
        }
    }
}

// Shape of the optional TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    poll_interval_secs: Option<u64>,
    session_file: Option<PathBuf>,
    log_format: Option<LogFormat>,
}

impl ClientConfig {
    // Defaults, then the file named by RIDE_CLIENT_CONFIG, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Some(read_file(Path::new(&path))?),
            None => None,
        };
        Self::from_sources(file.as_deref(), |name| std::env::var(name).ok())
    }

    pub fn from_sources<E>(file: Option<&str>, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = file {
            let file: FileConfig = toml::from_str(raw)?;
            if let Some(url) = file.base_url {
                config.base_url = url;
            }
            if let Some(ms) = file.request_timeout_ms {
                config.request_timeout = Duration::from_millis(ms);
            }
            if let Some(secs) = file.poll_interval_secs {
                config.poll_interval = Duration::from_secs(secs);
            }
            if let Some(path) = file.session_file {
                config.storage_path = Some(path);
            }
            if let Some(format) = file.log_format {
                config.log_format = format;
            }
        }

        if let Some(url) = env(BASE_URL_VAR) {
            config.base_url = url;
        }
        if let Some(value) = env(TIMEOUT_VAR) {
            config.request_timeout = Duration::from_millis(parse_number(TIMEOUT_VAR, &value)?);
        }
        if let Some(value) = env(POLL_INTERVAL_VAR) {
            config.poll_interval = Duration::from_secs(parse_number(POLL_INTERVAL_VAR, &value)?);
        }
        if let Some(path) = env(SESSION_FILE_VAR).filter(|path| !path.trim().is_empty()) {
            config.storage_path = Some(PathBuf::from(path));
        }
        if let Some(value) = env(LOG_FORMAT_VAR) {
            config.log_format = LogFormat::from_env_value(&value);
        }

        config.base_url = normalize_base_url(&config.base_url)?;
        if config.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: TIMEOUT_VAR,
                value: "0".to_string(),
            });
        }
        if config.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                name: POLL_INTERVAL_VAR,
                value: "0".to_string(),
            });
        }
        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).map_err(|err| ConfigError::BaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::BaseUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
