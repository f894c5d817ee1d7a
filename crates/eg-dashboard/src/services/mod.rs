pub mod typhoon_service;
pub mod weather_service;

pub use typhoon_service::{
    request_scan as request_typhoon_scan, TyphoonError, TyphoonServiceMessage, TyphoonWatcher,
};
pub use weather_service::{
    fetch_weather, request_fetch as request_weather_fetch, WeatherFetchError, WeatherServiceMessage,
    WeatherSnapshot, WeatherStream, DAILY_FORECAST_DAYS,
};
