use crate::services::TyphoonError;
use eg_core::{AppError, WeatherError};

impl From<TyphoonError> for AppError {
    fn from(e: TyphoonError) -> Self {
        match e {
            TyphoonError::AllCheckpointsFailed { .. } => {
                AppError::Weather(WeatherError::TyphoonUnavailable(e.to_string()))
            }
        }
    }
}
