//! Configuration module for the problem server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Command-line arguments for the problem server
#[derive(Parser, Debug)]
#[command(name = "problem-server")]
#[command(version)]
#[command(about = "A line-oriented TCP server for small text problems", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for the timestamped log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Only log to stdout
    #[arg(long)]
    pub no_log_file: bool,

    /// Send "Error: <reason>" to clients whose request could not be read
    #[arg(long)]
    pub report_errors: bool,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reply with an error line instead of closing silently on read failure
    #[serde(default)]
    pub report_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            report_errors: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory the log file is created in
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    /// Whether to write a log file at all
    #[serde(default = "default_log_file")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_dir(),
            file: default_log_file(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file() -> bool {
    true
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub report_errors: bool,
    pub log_level: String,
    /// `None` disables the log file
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    /// Resolve parsed CLI args against the TOML file they point to, if any.
    /// CLI arguments take precedence over TOML file values.
    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        Ok(Self::merge(cli, toml_config))
    }

    fn merge(cli: CliArgs, toml_config: TomlConfig) -> Self {
        let log_file = toml_config.logging.file && !cli.no_log_file;

        Config {
            host: cli.host.unwrap_or(toml_config.server.host),
            port: cli.port.unwrap_or(toml_config.server.port),
            report_errors: cli.report_errors || toml_config.server.report_errors,
            log_level: cli.log_level.unwrap_or(toml_config.logging.level),
            log_dir: if log_file {
                Some(cli.log_dir.unwrap_or(toml_config.logging.directory))
            } else {
                None
            },
        }
    }

    /// Address to bind, as `host:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("problem-server").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_args(parse(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
        assert!(!config.report_errors);
    }

    #[test]
    fn test_cli_flags() {
        let config = Config::from_args(parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--no-log-file",
            "--report-errors",
        ]))
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.log_dir, None);
        assert!(config.report_errors);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [server]
            host = "127.0.0.1"
            port = 9090
            report_errors = true

            [logging]
            level = "debug"
            directory = "/var/log/problems"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert!(config.server.report_errors);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/problems"));
        assert!(config.logging.file);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [logging]
            level = "debug"
            file = false
        "#,
        )
        .unwrap();

        let config = Config::merge(parse(&["--port", "7000"]), toml_config);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 7000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_args(parse(&["--config", "/nonexistent/problem-server.toml"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }
}
