//! Configuration management for weathermail
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::NotifyError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for weathermail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Identity provider settings
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Outgoing mail settings
    #[serde(default)]
    pub mail: MailConfig,
    /// Fan-out settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// HTTP trigger settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// OpenTelemetry export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Identity provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Users endpoint; the handle is appended as a path segment
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    /// Access token sent with every lookup
    pub token: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Weather API key
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u32,
}

/// SMTP configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address, e.g. `Weathermail <noreply@example.com>`
    #[serde(default)]
    pub from: String,
    /// TLS mode: `starttls`, `tls` or `none`
    #[serde(default = "default_smtp_tls")]
    pub tls: String,
    /// Connection timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of recipient chains in flight at once
    #[serde(default = "default_max_concurrent_recipients")]
    pub max_concurrent_recipients: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole trigger request, fan-out included
    #[serde(default = "default_server_timeout")]
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Export traces, logs and metrics over OTLP/HTTP
    #[serde(default)]
    pub otlp_enabled: bool,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_identity_base_url() -> String {
    "https://api.github.com/users".to_string()
}

fn default_user_agent() -> String {
    format!("weathermail/{}", crate::VERSION)
}

fn default_weather_base_url() -> String {
    "http://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_request_timeout() -> u32 {
    10
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_tls() -> String {
    "starttls".to_string()
}

fn default_max_concurrent_recipients() -> usize {
    16
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_server_timeout() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "weathermail".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: default_identity_base_url(),
            token: None,
            user_agent: default_user_agent(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: String::new(),
            tls: default_smtp_tls(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_recipients: default_max_concurrent_recipients(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            request_timeout_seconds: default_server_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_enabled: false,
            service_name: default_service_name(),
        }
    }
}

impl IdentityConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl MailConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl NotifierConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERMAIL_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERMAIL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: NotifierConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathermail").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.identity.base_url.is_empty() {
            self.identity.base_url = default_identity_base_url();
        }
        if self.identity.user_agent.is_empty() {
            self.identity.user_agent = default_user_agent();
        }
        if self.identity.timeout_seconds == 0 {
            self.identity.timeout_seconds = default_request_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_request_timeout();
        }
        if self.mail.timeout_seconds == 0 {
            self.mail.timeout_seconds = default_request_timeout();
        }
        if self.mail.tls.is_empty() {
            self.mail.tls = default_smtp_tls();
        }
        if self.dispatch.max_concurrent_recipients == 0 {
            self.dispatch.max_concurrent_recipients = default_max_concurrent_recipients();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_server_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.telemetry.service_name.is_empty() {
            self.telemetry.service_name = default_service_name();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_credentials(&self) -> Result<()> {
        if let Some(token) = &self.identity.token {
            if token.trim().is_empty() {
                return Err(NotifyError::config(
                    "Identity token cannot be empty if provided. Either remove it or provide a valid token.",
                )
                .into());
            }
        }

        if let Some(api_key) = &self.weather.api_key {
            if api_key.trim().is_empty() {
                return Err(NotifyError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        if self.mail.username.is_some() != self.mail.password.is_some() {
            return Err(NotifyError::config(
                "SMTP username and password must be provided together",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, seconds) in [
            ("Identity", self.identity.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("SMTP", self.mail.timeout_seconds),
        ] {
            if seconds > 300 {
                return Err(NotifyError::config(format!(
                    "{name} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        if self.dispatch.max_concurrent_recipients == 0
            || self.dispatch.max_concurrent_recipients > 1024
        {
            return Err(NotifyError::config(
                "Max concurrent recipients must be between 1 and 1024",
            )
            .into());
        }

        if self.server.request_timeout_seconds > 3600 {
            return Err(NotifyError::config(
                "Server request timeout cannot exceed 3600 seconds",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NotifyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NotifyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_tls_modes = ["starttls", "tls", "none"];
        if !valid_tls_modes.contains(&self.mail.tls.as_str()) {
            return Err(NotifyError::config(format!(
                "Invalid SMTP TLS mode '{}'. Must be one of: {}",
                self.mail.tls,
                valid_tls_modes.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Identity", &self.identity.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NotifyError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Settings the mail transport cannot start without
    pub fn validate_mail(&self) -> Result<()> {
        if self.mail.smtp_host.trim().is_empty() {
            return Err(NotifyError::config("SMTP host is required").into());
        }
        if self.mail.from.trim().is_empty() {
            return Err(NotifyError::config("Sender address (mail.from) is required").into());
        }
        Ok(())
    }
}
