//! TOML configuration for shuttle-lms.
//!
//! The file is optional.  When `--config <PATH>` is given that file must
//! exist; otherwise `$XDG_CONFIG_HOME/shuttle-lms/config.toml` (falling back
//! to `~/.config/shuttle-lms/config.toml`) is read if present.  Every field
//! has a built-in default, so an empty file is valid:
//!
//! ```toml
//! log_level = "INFO"
//!
//! [server]
//! host = "192.168.0.100"
//! port = 9090
//! player = "cube"
//! timeout_secs = 5
//!
//! [device]
//! name_contains = "Shuttle"
//! ```
//!
//! Command-line flags and their environment variables take precedence over
//! anything read here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::DEFAULT_DEVICE_SEARCH;
use crate::infrastructure::media_server::DEFAULT_PORT;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The log level is not one of the accepted names.
    #[error("unrecognised log level {0}")]
    InvalidLogLevel(String),

    /// Server calls need a non-zero timeout.
    #[error("server timeout must be at least one second")]
    ZeroTimeout,
}

// ── Log level ─────────────────────────────────────────────────────────────────

/// Accepted log-level names, matched case-insensitively, and the threshold
/// each one selects.
pub const LOG_LEVELS: [(&str, LogLevel); 9] = [
    ("NOTSET", LogLevel::Trace),
    ("TRACE", LogLevel::Trace),
    ("DEBUG", LogLevel::Debug),
    ("INFO", LogLevel::Info),
    ("WARN", LogLevel::Warn),
    ("WARNING", LogLevel::Warn),
    ("ERROR", LogLevel::Error),
    ("CRITICAL", LogLevel::Error),
    ("FATAL", LogLevel::Error),
];

/// Logging threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string for an `EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LOG_LEVELS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, level)| level)
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_directive().to_ascii_uppercase())
    }
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// A name from [`LOG_LEVELS`]; validated by [`AppConfig::log_level`].
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

/// Media server and target player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Hostname or IP address of the LMS server.
    #[serde(default = "default_host")]
    pub host: String,
    /// LMS CLI port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Exact display name of the player to control.
    #[serde(default = "default_player")]
    pub player: String,
    /// Connect/read/write timeout for server calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Input device selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Case-sensitive substring of the device name to bind.
    #[serde(default = "default_name_contains")]
    pub name_contains: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "INFO".to_string()
}
fn default_host() -> String {
    "192.168.0.100".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_player() -> String {
    "cube".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_name_contains() -> String {
    DEFAULT_DEVICE_SEARCH.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            player: default_player(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name_contains: default_name_contains(),
        }
    }
}

impl AppConfig {
    /// Parses [`log_level`](Self::log_level).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogLevel`] for a name outside
    /// [`LOG_LEVELS`].
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level.parse()
    }

    /// Checks every field that has a restricted range.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<LogLevel, ConfigError> {
        let level = self.log_level()?;
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(level)
    }
}

impl ServerConfig {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Path of the per-user config file, if a base directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("shuttle-lms").join("config.toml"))
}

/// Loads the configuration.
///
/// With `explicit` set, that file must exist.  Without it, the per-user file
/// is read if present and defaults are used otherwise.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if a file exists but cannot be read (or an
/// explicit file is missing), and [`ConfigError::Parse`] for malformed TOML.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) => load_optional(&path),
            None => Ok(AppConfig::default()),
        },
    }
}

/// Reads `path`, returning defaults if it does not exist.
fn load_optional(path: &Path) -> Result<AppConfig, ConfigError> {
    match read_config(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(AppConfig::default())
        }
        other => other,
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes `content` to a fresh file under the system temp dir.
    fn temp_config(tag: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shuttle_lms_test_{}_{tag}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_matches_documented_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.server.host, "192.168.0.100");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.player, "cube");
        assert_eq!(cfg.server.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.device.name_contains, "Shuttle");
        assert_eq!(cfg.log_level().unwrap(), LogLevel::Info);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("empty file is valid");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_server_overrides_defaults() {
        // Arrange
        let toml_str = r#"
log_level = "debug"
[server]
player = "kitchen"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.server.player, "kitchen");
        assert_eq!(cfg.log_level().unwrap(), LogLevel::Debug);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.device.name_contains, "Shuttle");
    }

    #[test]
    fn test_app_config_round_trips_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "lms.local".to_string();
        cfg.device.name_contains = "ShuttleXpress".to_string();

        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    // ── Log level ─────────────────────────────────────────────────────────────

    #[test]
    fn test_every_accepted_name_parses_in_any_case() {
        for (name, level) in LOG_LEVELS {
            assert_eq!(name.parse::<LogLevel>().unwrap(), level, "{name}");
            assert_eq!(name.to_lowercase().parse::<LogLevel>().unwrap(), level, "{name}");
        }
    }

    #[test]
    fn test_aliases_select_expected_threshold() {
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("fatal".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("NOTSET".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::Warn.as_directive(), "warn");
    }

    #[test]
    fn test_names_outside_the_table_are_rejected() {
        for name in ["VERBOSE", "WARN ", "", "5"] {
            assert!(name.parse::<LogLevel>().is_err(), "{name:?}");
        }
    }

    #[test]
    fn test_unknown_log_level_is_rejected_with_message() {
        // Act
        let err = "verbose".parse::<LogLevel>().unwrap_err();

        // Assert
        assert!(matches!(err, ConfigError::InvalidLogLevel(ref s) if s == "verbose"));
        assert_eq!(err.to_string(), "unrecognised log level verbose");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut cfg = AppConfig::default();
        cfg.server.timeout_secs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_validate_reports_log_level_first() {
        let mut cfg = AppConfig::default();
        cfg.log_level = "LOUD".to_string();
        cfg.server.timeout_secs = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidLogLevel(_))));
    }

    // ── load_config ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_reads_explicit_file() {
        // Arrange
        let path = temp_config("explicit", "[server]\nport = 9000\n");

        // Act
        let cfg = load_config(Some(&path)).expect("load");

        // Assert
        assert_eq!(cfg.server.port, 9000);

        // Cleanup
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_config_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_optional_missing_file_gives_defaults() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        assert_eq!(load_optional(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_malformed_file_is_parse_error() {
        let path = temp_config("malformed", "[[[ not valid toml");

        let result = load_config(Some(&path));

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_default_config_path_ends_with_config_toml() {
        // None is acceptable in a stripped environment without HOME.
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("shuttle-lms/config.toml"), "{path:?}");
        }
    }
}
