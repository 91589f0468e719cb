//! Process configuration.
//!
//! Settings come from command-line flags, with two environment overrides:
//!
//! | Flag | Default | Environment |
//! |------|---------|-------------|
//! | `--dir` | `.` | |
//! | `--host` | all interfaces | |
//! | `--port` | `80` | `PORT`, when set and non-empty, wins over the flag |
//! | `--log-level` | `info` | `COURIER_LOG`, used when the flag is absent |
//! | `--log-format` | `json` | |

use clap::Parser;
use courier_telemetry::logging::LOG_ENV_VAR;
use courier_telemetry::{LogConfig, LogFormat};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that overrides `--port`.
pub const PORT_ENV_VAR: &str = "PORT";

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "courier",
    about = "Serve a directory, QR codes and Prometheus metrics over HTTP",
    version
)]
pub struct Args {
    /// Directory to serve.
    #[arg(long, value_name = "path", default_value = ".")]
    pub dir: PathBuf,

    /// Host to listen on; empty means every interface.
    #[arg(long, value_name = "host", default_value = "")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, value_name = "port", default_value = "80")]
    pub port: String,

    /// Log filter directive, e.g. `info` or `courier_server=debug,info`.
    #[arg(long = "log-level", value_name = "filter", env = LOG_ENV_VAR, default_value = "info")]
    pub log_level: String,

    /// Log output format: `json` or `pretty`.
    #[arg(long = "log-format", value_name = "format", default_value = "json")]
    pub log_format: LogFormat,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The port is not a number in `0..=65535`.
    #[error("invalid port {0:?}")]
    InvalidPort(String),

    /// The directory to serve does not exist.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory served for static files.
    pub dir: PathBuf,
    /// Listen host; empty means every interface.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Logging configuration.
    pub log: LogConfig,
}

impl Settings {
    /// Resolves settings from parsed flags and the process environment.
    pub fn from_env(args: Args) -> Result<Self, ConfigError> {
        Self::resolve(args, std::env::var(PORT_ENV_VAR).ok())
    }

    /// Resolves settings from parsed flags and an optional `PORT` value.
    ///
    /// A non-empty `env_port` replaces `--port`.
    pub fn resolve(args: Args, env_port: Option<String>) -> Result<Self, ConfigError> {
        let port = match env_port {
            Some(port) if !port.is_empty() => port,
            _ => args.port,
        };
        let port = port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        if !args.dir.is_dir() {
            return Err(ConfigError::NotADirectory(args.dir));
        }

        Ok(Self {
            dir: args.dir,
            host: args.host,
            port,
            log: LogConfig::default()
                .with_level(args.log_level)
                .with_format(args.log_format),
        })
    }

    /// Returns the address to bind, e.g. `0.0.0.0:80` or `[::1]:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        match self.host.as_str() {
            "" => format!("0.0.0.0:{}", self.port),
            host if host.contains(':') && !host.starts_with('[') => {
                format!("[{host}]:{}", self.port)
            }
            host => format!("{host}:{}", self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("courier").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.host, "");
        assert_eq!(args.port, "80");
        assert_eq!(args.log_format, LogFormat::Json);

        let settings = Settings::resolve(args, None).unwrap();
        assert_eq!(settings.port, 80);
        assert_eq!(settings.bind_addr(), "0.0.0.0:80");
    }

    #[test]
    fn test_env_port_wins_over_flag() {
        let args = parse(&["--port", "8080"]);
        let settings = Settings::resolve(args, Some("9090".into())).unwrap();
        assert_eq!(settings.port, 9090);
    }

    #[test]
    fn test_empty_env_port_is_ignored() {
        let args = parse(&["--port", "8080"]);
        let settings = Settings::resolve(args, Some(String::new())).unwrap();
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let args = parse(&["--port", "http"]);
        let err = Settings::resolve(args, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref p) if p == "http"));

        let args = parse(&[]);
        let err = Settings::resolve(args, Some("70000".into())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_missing_dir() {
        let args = parse(&["--dir", "/definitely/not/here"]);
        let err = Settings::resolve(args, None).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(_)));
    }

    #[test]
    fn test_bind_addr_hosts() {
        let mut settings = Settings::resolve(parse(&["--port", "3000"]), None).unwrap();
        settings.host = "localhost".into();
        assert_eq!(settings.bind_addr(), "localhost:3000");
        settings.host = "::1".into();
        assert_eq!(settings.bind_addr(), "[::1]:3000");
        settings.host = "[::1]".into();
        assert_eq!(settings.bind_addr(), "[::1]:3000");
    }

    #[test]
    fn test_log_flags() {
        let args = parse(&["--log-level", "debug", "--log-format", "pretty"]);
        let settings = Settings::resolve(args, None).unwrap();
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.format, LogFormat::Pretty);

        assert!(Args::try_parse_from(["courier", "--log-format", "xml"]).is_err());
    }
}
