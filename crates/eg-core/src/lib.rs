pub mod config;
pub mod error;
pub mod fetch_state;

pub use config::{ApiConfig, Config, DashboardConfig, TyphoonConfig, ValidationResult};
pub use error::{
    AppError, ConfigError, WeatherError, TYPHOON_UNAVAILABLE_MESSAGE,
    WEATHER_UNAVAILABLE_MESSAGE,
};
pub use fetch_state::FetchState;

use anyhow::Result;

/// Initialize logging for the application.
///
/// Reads the filter from `RUST_LOG`, falling back to `info`. Calling this
/// twice is harmless; the second subscriber install is ignored.
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    if installed.is_ok() {
        tracing::info!("EG Weather core initialized");
    }
    Ok(())
}
