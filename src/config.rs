//! Server configuration.
//!
//! Built from defaults, then an optional TOML file, then command-line
//! overrides (see [`crate::cli`]).

use std::fmt;
use std::net::{Ipv6Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use crate::store::query::PageBounds;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("invalid pagination settings: {0}")]
    InvalidPagination(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page size settings applied to every listing RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Used when a request leaves the page size unset.
    pub default_page_size: usize,
    pub min_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            min_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    pub fn bounds(&self) -> PageBounds {
        PageBounds::new(self.min_page_size, self.max_page_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_page_size == 0 {
            return Err(ConfigError::InvalidPagination(
                "min_page_size must be at least 1".into(),
            ));
        }
        if !(self.min_page_size..=self.max_page_size).contains(&self.default_page_size) {
            return Err(ConfigError::InvalidPagination(format!(
                "default_page_size ({}) must lie within [{}, {}]",
                self.default_page_size, self.min_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: LogLevel,
    pub pagination: PaginationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv6Addr::LOCALHOST, 50051)),
            log_level: LogLevel::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl Config {
    /// Loads a TOML file. Missing keys take their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.pagination.validate()?;
        Ok(config)
    }
}
