use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(skip)]
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard preferences
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Typhoon tracking settings
    #[serde(default)]
    pub typhoon: TyphoonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeatherMap API key. `OPENWEATHER_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the current-weather and forecast endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for weather map tiles
    #[serde(default = "default_maps_base_url")]
    pub maps_base_url: String,

    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    /// Per-request timeout. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_maps_base_url() -> String {
    "http://maps.openweathermap.org/maps/2.0/weather".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "zh_tw".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            maps_base_url: default_maps_base_url(),
            units: default_units(),
            lang: default_lang(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// The API key to use, preferring the environment over the file.
    pub fn effective_api_key(&self) -> String {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// English alias of the place selected on startup
    #[serde(default = "default_place")]
    pub default_place: String,
}

fn default_place() -> String {
    "Taipei".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_place: default_place(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TyphoonConfig {
    /// Poll interval while the typhoon view is active
    #[serde(default = "default_poll_minutes")]
    pub poll_minutes: u32,

    #[serde(default = "default_overlay_zoom")]
    pub overlay_zoom: u32,

    #[serde(default = "default_overlay_x")]
    pub overlay_x: u32,

    #[serde(default = "default_overlay_y")]
    pub overlay_y: u32,
}

fn default_poll_minutes() -> u32 {
    30
}

fn default_overlay_zoom() -> u32 {
    6
}

fn default_overlay_x() -> u32 {
    54
}

fn default_overlay_y() -> u32 {
    25
}

impl Default for TyphoonConfig {
    fn default() -> Self {
        Self {
            poll_minutes: default_poll_minutes(),
            overlay_zoom: default_overlay_zoom(),
            overlay_x: default_overlay_x(),
            overlay_y: default_overlay_y(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            api: ApiConfig::default(),
            dashboard: DashboardConfig::default(),
            typhoon: TyphoonConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("egweather")
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = Self::load_from(&path)?;
        config.config_dir = default_config_dir();
        Ok(config)
    }

    /// Load configuration from a specific file, writing defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        if let Some(parent) = path.parent() {
            config.config_dir = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load with [`ConfigError::Invalid`].
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load()?.into_validated()
    }

    /// Validate a loaded configuration, failing on errors and logging warnings.
    pub fn into_validated(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.api.base_url, "api.base_url", &mut result);
        validate_url(&self.api.maps_base_url, "api.maps_base_url", &mut result);

        if self.api.effective_api_key().trim().is_empty() {
            result.add_warning(
                "api.api_key",
                format!("No API key configured; set it in the config file or {}", API_KEY_ENV),
            );
        }

        if self.api.units != "metric" {
            result.add_warning(
                "api.units",
                "Thresholds assume metric units (m/s, hPa); other unit systems will misclassify",
            );
        }

        if self.api.request_timeout_secs == Some(0) {
            result.add_error("api.request_timeout_secs", "Timeout must be greater than 0");
        }

        if self.dashboard.default_place.trim().is_empty() {
            result.add_error("dashboard.default_place", "Default place must not be empty");
        }

        if self.typhoon.poll_minutes == 0 {
            result.add_error("typhoon.poll_minutes", "Poll interval must be greater than 0");
        } else if self.typhoon.poll_minutes > 1440 {
            result.add_warning(
                "typhoon.poll_minutes",
                "Typhoon poll interval is more than 24 hours",
            );
        }

        result
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path to the configuration file
    pub fn config_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
