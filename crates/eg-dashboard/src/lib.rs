//! Dashboard orchestration for EG Weather.
//!
//! View-models own the fetch state for each data stream and drive its
//! transitions. Network work is spawned on a shared tokio runtime and the
//! results come back over a channel, which the owning model drains.

pub mod app_services;
mod error_mapping;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

pub use app_services::{client_settings, AppServices};
pub use models::{OverlaySettings, TyphoonModel, WeatherModel};
pub use services::{
    fetch_weather, TyphoonError, TyphoonWatcher, WeatherFetchError, WeatherSnapshot,
    WeatherStream,
};
