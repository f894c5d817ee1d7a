//! Centralized error types for EG Weather.
//!
//! This module provides a typed error hierarchy that:
//! - Gives every failure a user-facing message suitable for display
//! - Preserves full error context for logging

use thiserror::Error;

/// Fixed message shown whenever current conditions or the forecast can't be loaded.
pub const WEATHER_UNAVAILABLE_MESSAGE: &str = "無法取得天氣資料，請稍後再試";

/// Fixed message shown when the typhoon scan itself can't run.
pub const TYPHOON_UNAVAILABLE_MESSAGE: &str = "無法獲取颱風資訊，請稍後再試";

/// Top-level application error type.
///
/// Use `user_message()` to get a display-safe message; the `Display` impl
/// carries the technical detail and is meant for logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    /// Service-level errors raised by the dashboard layer.
    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Service(_) => "發生錯誤，請再試一次",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "設定無效，請檢查設定檔",
            ConfigError::ParseError(_) => "設定檔格式錯誤，請檢查設定檔",
        }
    }
}

/// Weather and typhoon data errors as seen by the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Current conditions and/or forecast could not be loaded.
    #[error("Weather data unavailable: {0}")]
    Unavailable(String),

    /// The typhoon scan could not run at all.
    #[error("Typhoon scan unavailable: {0}")]
    TyphoonUnavailable(String),

    #[error("Unknown place: {0}")]
    UnknownPlace(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Unavailable(_) => WEATHER_UNAVAILABLE_MESSAGE,
            WeatherError::TyphoonUnavailable(_) => TYPHOON_UNAVAILABLE_MESSAGE,
            WeatherError::UnknownPlace(_) => "找不到指定的縣市",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Config(ConfigError::ParseError("test".into())),
            AppError::Weather(WeatherError::UnknownPlace("Atlantis".into())),
            AppError::Service("test".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_weather_unavailable_uses_fixed_message() {
        let app_err: AppError = WeatherError::Unavailable("HTTP 500 from weather".into()).into();
        assert_eq!(app_err.user_message(), WEATHER_UNAVAILABLE_MESSAGE);
        // Detail stays in Display for logs, never in the user message
        assert!(app_err.to_string().contains("HTTP 500"));
        assert!(!app_err.user_message().contains("500"));
    }

    #[test]
    fn test_typhoon_unavailable_uses_fixed_message() {
        let app_err: AppError = WeatherError::TyphoonUnavailable("5 failed".into()).into();
        assert_eq!(app_err.user_message(), TYPHOON_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_app_error_conversion() {
        let err: AppError = ConfigError::ParseError("expected `=`".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::ParseError(_))));
    }
}
