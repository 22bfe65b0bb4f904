//! Configuration management for the `OfficeMap` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::OfficeMapError;
use crate::models::MapSettings;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `OfficeMap` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficeMapConfig {
    /// Address search API configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Rendered map dimensions
    #[serde(default)]
    pub map: MapSettings,
    /// Selection control configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Address search API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Scheme and host of the search service
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Path of the address search endpoint
    #[serde(default = "default_search_path")]
    pub path: String,
    /// Request timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u64,
}

/// Selection control settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Name shown next to the control
    #[serde(default = "default_control_name")]
    pub control_name: String,
    /// Place names offered by the control
    #[serde(default = "default_options")]
    pub options: Vec<String>,
    /// Preselected place name
    #[serde(default = "default_option")]
    pub default_option: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
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

// Default value functions
fn default_search_base_url() -> String {
    "https://msearch.gsi.go.jp".to_string()
}

fn default_search_path() -> String {
    "/address-search/AddressSearch".to_string()
}

fn default_search_timeout() -> u64 {
    10
}

fn default_control_name() -> String {
    "place".to_string()
}

fn default_options() -> Vec<String> {
    vec!["市役所".to_string(), "区役所".to_string(), "県庁".to_string()]
}

fn default_option() -> String {
    "市役所".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5006
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            path: default_search_path(),
            timeout_seconds: default_search_timeout(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            control_name: default_control_name(),
            options: default_options(),
            default_option: default_option(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
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

impl OfficeMapConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicit path must exist; the default location is optional
        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(OfficeMapError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )))
                    .with_context(|| "Failed to load configuration");
                }
                builder = builder.add_source(
                    File::from(path)
                        .required(true)
                        .format(config::FileFormat::Toml),
                );
            }
            None => {
                let default_file =
                    Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"));
                if default_file.exists() {
                    builder = builder.add_source(
                        File::from(default_file)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // OFFICEMAP_SERVER__PORT=8080, OFFICEMAP_DASHBOARD__OPTIONS=市役所,県庁
        builder = builder.add_source(
            Environment::with_prefix("OFFICEMAP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dashboard.options")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: OfficeMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("officemap").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.search.base_url.is_empty() {
            self.search.base_url = default_search_base_url();
        }
        if self.search.path.is_empty() {
            self.search.path = default_search_path();
        }
        if self.dashboard.control_name.is_empty() {
            self.dashboard.control_name = default_control_name();
        }
        if self.dashboard.options.is_empty() {
            self.dashboard.options = default_options();
        }
        if self.dashboard.default_option.is_empty() {
            if let Some(first) = self.dashboard.options.first() {
                self.dashboard.default_option = first.clone();
            }
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_dashboard()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.search.timeout_seconds == 0 || self.search.timeout_seconds > 120 {
            return Err(OfficeMapError::config(
                "Address search timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if self.map.zoom > 19 {
            return Err(OfficeMapError::config("Map zoom cannot exceed 19").into());
        }

        if self.map.width == 0 || self.map.height == 0 {
            return Err(OfficeMapError::config("Map width and height must be positive").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(OfficeMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(OfficeMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.search.base_url.starts_with("http://")
            && !self.search.base_url.starts_with("https://")
        {
            return Err(OfficeMapError::config(
                "Address search base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if !self.search.path.starts_with('/') {
            return Err(OfficeMapError::config("Address search path must start with '/'").into());
        }

        Ok(())
    }

    /// Validate the selection control options
    fn validate_dashboard(&self) -> Result<()> {
        if self.dashboard.options.iter().any(|option| option.trim().is_empty()) {
            return Err(OfficeMapError::config("Dashboard options cannot be blank").into());
        }

        if !self.dashboard.options.contains(&self.dashboard.default_option) {
            return Err(OfficeMapError::config(format!(
                "Default option '{}' is not one of the dashboard options",
                self.dashboard.default_option
            ))
            .into());
        }

        Ok(())
    }
}
