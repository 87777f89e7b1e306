//! User configuration loaded from `config.toml`.
//!
//! Every key is optional; anything missing takes its default. A missing file is
//! not an error. A malformed file is reported by [`load`] and the caller falls
//! back to defaults, so a typo never prevents startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "CINELOG_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the REST service, e.g. `http://localhost:8080`.
    pub api_base_url: String,
    /// `dark` or `catppuccin-mocha`.
    pub theme: String,
    pub debounce_ms: u64,
    pub page_size: usize,
    /// Where the session database and log file live. Defaults to the XDG data dir.
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            debounce_ms: 300,
            page_size: 10,
            data_dir: None,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Resolved data directory: the configured one, else `$XDG_DATA_HOME/cinelog`,
    /// else `~/.local/share/cinelog`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        std::env::var("XDG_DATA_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".local").join("share"))
            })
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join("cinelog")
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_owned();
        }
    }
}

/// Returns the path to the cinelog config file.
///
/// Prefers `$XDG_CONFIG_HOME/cinelog/config.toml`; falls back to
/// `~/.config/cinelog/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("cinelog").join("config.toml")
}

/// Loads the config at `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => return Err(ConfigError::Read { path: path.to_owned(), source }),
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
}
