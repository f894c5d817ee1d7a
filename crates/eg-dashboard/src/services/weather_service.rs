//! Weather backend: joined current + forecast fetch for one place.
//! Network work runs on the shared runtime; results are sent over a channel.

use std::fmt;
use std::sync::Arc;

use eg_weather::{CurrentConditions, ForecastEntry, ForecastSeries, Place, WeatherSource};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Days shown in the daily forecast.
pub const DAILY_FORECAST_DAYS: usize = 5;

/// Which half of the joined pair a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherStream {
    Current,
    Forecast,
}

impl fmt::Display for WeatherStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherStream::Current => write!(f, "current conditions"),
            WeatherStream::Forecast => write!(f, "forecast"),
        }
    }
}

/// Error type for weather fetches.
#[derive(Debug, Clone, Error)]
pub enum WeatherFetchError {
    /// Both requests failed at the transport or HTTP level
    #[error("Weather request failed: {0}")]
    Network(String),

    /// Both requests failed and at least one body was malformed
    #[error("Weather response malformed: {0}")]
    Decode(String),

    /// One request failed; the other result is discarded
    #[error("{stream} request failed: {reason}")]
    PartialFailure {
        stream: WeatherStream,
        reason: String,
    },
}

/// Current conditions and forecast for one place, fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub place: Place,
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
}

impl WeatherSnapshot {
    /// First forecast entry per day, up to five days.
    pub fn daily_forecast(&self) -> Vec<&ForecastEntry> {
        self.forecast.daily(DAILY_FORECAST_DAYS)
    }
}

/// Messages sent from async operations back to the owning model.
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of a fetch issued for request `generation`
    FetchDone {
        generation: u64,
        result: Result<WeatherSnapshot, WeatherFetchError>,
    },
}

/// Fetch current conditions and forecast concurrently. Both must succeed.
pub async fn fetch_weather(
    source: &dyn WeatherSource,
    place: Place,
) -> Result<WeatherSnapshot, WeatherFetchError> {
    let lat = place.coordinate.latitude;
    let lon = place.coordinate.longitude;

    let (current, forecast) = tokio::join!(
        source.fetch_current(lat, lon),
        source.fetch_forecast(lat, lon)
    );

    match (current, forecast) {
        (Ok(current), Ok(forecast)) => Ok(WeatherSnapshot {
            place,
            current,
            forecast,
        }),
        (Err(e), Ok(_)) => Err(WeatherFetchError::PartialFailure {
            stream: WeatherStream::Current,
            reason: e.to_string(),
        }),
        (Ok(_), Err(e)) => Err(WeatherFetchError::PartialFailure {
            stream: WeatherStream::Forecast,
            reason: e.to_string(),
        }),
        (Err(current_err), Err(forecast_err)) => {
            let detail = format!("current: {}; forecast: {}", current_err, forecast_err);
            if current_err.is_decode() || forecast_err.is_decode() {
                Err(WeatherFetchError::Decode(detail))
            } else {
                Err(WeatherFetchError::Network(detail))
            }
        }
    }
}

/// Request a fetch on `runtime`. Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    runtime: &Handle,
    source: Arc<dyn WeatherSource>,
    place: Place,
    generation: u64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        tracing::debug!("Fetching weather for {} (request {})", place.name, generation);
        let result = fetch_weather(source.as_ref(), place).await;
        // Receiver gone means the model was dropped
        let _ = tx.send(WeatherServiceMessage::FetchDone { generation, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSource;
    use eg_weather::places;

    #[tokio::test]
    async fn test_fetch_weather_joins_both() {
        let source = FakeSource::new();
        let snapshot = fetch_weather(&source, places::default_place()).await.unwrap();

        assert_eq!(snapshot.place.english_name, "Taipei");
        assert_eq!(snapshot.current.place_name, "Taipei");
        assert!(!snapshot.forecast.is_empty());
        assert_eq!(source.current_calls(), 1);
        assert_eq!(source.forecast_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_weather_forecast_failure_is_partial() {
        let source = FakeSource::new();
        source.fail_forecast(true);

        let err = fetch_weather(&source, places::default_place())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WeatherFetchError::PartialFailure {
                stream: WeatherStream::Forecast,
                ..
            }
        ));
        assert!(err.to_string().starts_with("forecast request failed"));
    }

    #[tokio::test]
    async fn test_fetch_weather_both_failing() {
        let source = FakeSource::new();
        source.fail_current(true);
        source.fail_forecast(true);

        let err = fetch_weather(&source, places::default_place())
            .await
            .unwrap_err();
        // The fake's forecast failure is a malformed body
        assert!(matches!(err, WeatherFetchError::Decode(_)));
        assert!(err.to_string().contains("current: HTTP 500"));
        assert!(err.to_string().contains("forecast:"));
    }

    #[tokio::test]
    async fn test_request_fetch_reports_generation() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let source: Arc<dyn WeatherSource> = Arc::new(FakeSource::new());

        request_fetch(&tx, &Handle::current(), source, places::default_place(), 7);

        match rx.recv().await {
            Some(WeatherServiceMessage::FetchDone { generation, result }) => {
                assert_eq!(generation, 7);
                assert!(result.is_ok());
            }
            None => panic!("channel closed without a result"),
        }
    }

    #[test]
    fn test_stream_display() {
        assert_eq!(WeatherStream::Current.to_string(), "current conditions");
        assert_eq!(WeatherStream::Forecast.to_string(), "forecast");
    }
}
