//! Weather data for EG Weather
//!
//! Fetches current conditions and 3-hourly forecasts from OpenWeatherMap,
//! plus the pure helpers the dashboard needs around them: great-circle
//! distance, display formatting and the Taiwan place catalog.

pub mod client;
pub mod error;
pub mod format;
pub mod geo;
pub mod places;
pub mod types;

pub use client::{icon_url, ClientSettings, WeatherClient, WeatherSource};
pub use error::WeatherError;
pub use format::{format_date, format_last_update, format_temperature, format_time};
pub use geo::{distance_km, Coordinate, EARTH_RADIUS_KM};
pub use places::{Place, Region};
pub use types::*;
