//! Configuration loading and constants.
//!
//! The service runs with zero configuration: every section of `AppConfig` has
//! defaults matching the fixed template contract (`0.0.0.0:3002`, tag `rust`).
//! A TOML file and CLI/environment overrides can move the listener and tune
//! logging, but never change what `/health` returns beyond the service tag.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Service Identity
// =============================================================================

/// Literal tag identifying this template variant in the health payload and startup line
pub const SERVICE_TAG: &str = "rust";

/// Value of the `status` field in the health payload
pub const HEALTH_STATUS_OK: &str = "ok";

/// Path of the health check route
pub const HEALTH_PATH: &str = "/health";

// =============================================================================
// HTTP Listener
// =============================================================================

/// Default bind host (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port shared by every deployment of this template
pub const DEFAULT_PORT: u16 = 3002;

/// Default bind address, for help output
pub const DEFAULT_BIND_ADDR: &str = formatcp!("{}:{}", DEFAULT_HOST, DEFAULT_PORT);

/// Seconds to wait for in-flight connections after a shutdown signal
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Health responses are never cacheable
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path (optional; defaults apply if absent)
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "polyglot_service=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Accepted values for `logging.format`
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Service identity reported by the health check
    #[serde(default)]
    pub service: ServiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Graceful shutdown drain timeout in seconds (default: 30)
    #[serde(default = "HttpServerConfig::default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_timeout_seconds: Self::default_shutdown_timeout(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }

    fn default_shutdown_timeout() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }

    /// `host:port` string suitable for socket address parsing.
    ///
    /// IPv6 literals are bracketed so the port separator stays unambiguous.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Tag reported in the `service` field and the startup line
    #[serde(default = "ServiceConfig::default_tag")]
    pub tag: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tag: Self::default_tag(),
        }
    }
}

impl ServiceConfig {
    fn default_tag() -> String {
        SERVICE_TAG.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// Only the implicit default path may be missing. A path the operator
    /// asked for explicitly must exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply CLI/environment overrides on top of file values.
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.http.host = host;
        }
        if let Some(port) = port {
            self.http.port = port;
        }
    }

    /// Interpret the `PORT` environment variable.
    ///
    /// Unset and blank both mean "no override"; anything else must be a port.
    pub fn port_from_env(value: Option<&str>) -> Result<Option<u16>, ConfigError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(port) => port.parse().map(Some).map_err(|_| {
                ConfigError::Validation(format!("PORT must be a port number, got {:?}", port))
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Validation("http.host must not be empty".to_string()));
        }

        let tag = &self.service.tag;
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "service.tag must be a non-empty word, got {:?}",
                tag
            )));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_template_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3002);
        assert_eq!(config.http.shutdown_timeout_seconds, 30);
        assert_eq!(config.service.tag, "rust");
        assert!(!config.logging.is_json());
        assert_eq!(DEFAULT_BIND_ADDR, "0.0.0.0:3002");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = AppConfig::from_toml(include_str!("../config/default.toml")).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.http.bind_addr(), defaults.http.bind_addr());
        assert_eq!(
            config.http.shutdown_timeout_seconds,
            defaults.http.shutdown_timeout_seconds
        );
        assert_eq!(config.service.tag, defaults.service.tag);
        assert_eq!(config.logging.format, defaults.logging.format);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [http]
            port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.host, DEFAULT_HOST);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.service.tag, SERVICE_TAG);
        assert!(config.logging.is_json());
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_blank_tag_and_host() {
        let err = AppConfig::from_toml("[service]\ntag = \"two words\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = AppConfig::from_toml("[http]\nhost = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = AppConfig::from_toml("[http]\nprot = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_default_file_falls_back_but_explicit_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let config = AppConfig::load_or_default(&missing, false).unwrap();
        assert_eq!(config.http.port, DEFAULT_PORT);

        let err = AppConfig::load_or_default(&missing, true).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\ntag = \"rust-edge\"").unwrap();

        let config = AppConfig::load_or_default(file.path(), true).unwrap();
        assert_eq!(config.service.tag, "rust-edge");
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = AppConfig::from_toml("[http]\nport = 9000").unwrap();
        config.apply_overrides(Some("127.0.0.1".to_string()), Some(4000));
        assert_eq!(config.http.bind_addr(), "127.0.0.1:4000");

        config.apply_overrides(None, None);
        assert_eq!(config.http.port, 4000);
    }

    #[test]
    fn blank_port_env_is_no_override() {
        assert_eq!(AppConfig::port_from_env(None).unwrap(), None);
        assert_eq!(AppConfig::port_from_env(Some("")).unwrap(), None);
        assert_eq!(AppConfig::port_from_env(Some("  ")).unwrap(), None);
        assert_eq!(AppConfig::port_from_env(Some("8080")).unwrap(), Some(8080));
    }

    #[test]
    fn rejects_garbage_port_env() {
        for value in ["abc", "70000", "-1"] {
            let err = AppConfig::port_from_env(Some(value)).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "value {}", value);
        }
    }

    #[test]
    fn bind_addr_brackets_ipv6() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("::1".to_string()), Some(3002));
        assert_eq!(config.http.bind_addr(), "[::1]:3002");
    }
}
