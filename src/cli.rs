//! Command-line arguments using clap derive.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError, LogLevel};

/// gentree - a genealogical record store served over gRPC
#[derive(Parser, Debug)]
#[command(name = "gentree")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Log level, overriding the config file (RUST_LOG takes precedence)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Args {
    /// Resolves the effective configuration: defaults, then the config file,
    /// then flags.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn no_flags_gives_defaults() {
        let args = Args::try_parse_from(["gentree"]).unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.listen_addr, Config::default().listen_addr);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = \"127.0.0.1:7000\"\nlog_level = \"warn\"").unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let args = Args::try_parse_from([
            "gentree",
            "--config",
            &path,
            "--log-level",
            "trace",
        ])
        .unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:7000");
        assert_eq!(config.log_level, LogLevel::Trace);

        let args =
            Args::try_parse_from(["gentree", "--config", &path, "--listen", "0.0.0.0:9000"])
                .unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn unknown_log_level_rejected() {
        assert!(Args::try_parse_from(["gentree", "--log-level", "loud"]).is_err());
    }
}
