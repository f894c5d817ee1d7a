use eg_core::AppError;

/// Map a failure to build the HTTP client. Request-time errors never reach
/// here; the models collapse those into their fixed messages.
pub(crate) fn client_error(e: eg_weather::WeatherError) -> AppError {
    AppError::Service(e.to_string())
}
