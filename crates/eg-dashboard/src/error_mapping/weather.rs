use crate::services::WeatherFetchError;
use eg_core::{AppError, WeatherError};

impl From<WeatherFetchError> for AppError {
    fn from(e: WeatherFetchError) -> Self {
        // Every failure collapses to the same message; detail stays in Display
        AppError::Weather(WeatherError::Unavailable(e.to_string()))
    }
}
