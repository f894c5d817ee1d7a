//! In-memory weather source for model and service tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use eg_weather::{
    places, Coordinate, CurrentConditions, ForecastEntry, ForecastSeries, WeatherCondition,
    WeatherError, WeatherSource,
};
use parking_lot::Mutex;

/// Answers every coordinate with plausible Taiwan weather. Failures, storm
/// readings and per-latitude delays can be switched on per test.
pub(crate) struct FakeSource {
    fail_current: AtomicBool,
    fail_forecast: AtomicBool,
    current_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    /// (latitude, delay) pairs
    delays: Mutex<Vec<(f64, Duration)>>,
    /// Wind (m/s) and pressure (hPa) reported everywhere
    reading: Mutex<(f64, f64)>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self {
            fail_current: AtomicBool::new(false),
            fail_forecast: AtomicBool::new(false),
            current_calls: AtomicUsize::new(0),
            forecast_calls: AtomicUsize::new(0),
            delays: Mutex::new(Vec::new()),
            reading: Mutex::new((3.5, 1012.0)),
        }
    }

    pub(crate) fn fail_current(&self, fail: bool) {
        self.fail_current.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_forecast(&self, fail: bool) {
        self.fail_forecast.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn delay_at(&self, latitude: f64, delay: Duration) {
        self.delays.lock().push((latitude, delay));
    }

    pub(crate) fn storm_everywhere(&self, wind_ms: f64, pressure: f64) {
        *self.reading.lock() = (wind_ms, pressure);
    }

    pub(crate) fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    async fn maybe_wait(&self, lat: f64) {
        let delay = self
            .delays
            .lock()
            .iter()
            .find(|(l, _)| (*l - lat).abs() < 1e-9)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn place_name(lat: f64, lon: f64) -> String {
    places::all()
        .iter()
        .find(|p| p.coordinate == Coordinate::new(lat, lon))
        .map(|p| p.english_name.to_string())
        .unwrap_or_default()
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_wait(lat).await;

        if self.fail_current.load(Ordering::SeqCst) {
            return Err(WeatherError::Status {
                status: 500,
                endpoint: "weather",
            });
        }

        let (wind_speed, pressure) = *self.reading.lock();
        Ok(CurrentConditions {
            id: 1668341,
            place_name: place_name(lat, lon),
            coordinate: Coordinate::new(lat, lon),
            condition: WeatherCondition::Clouds,
            description: "多雲".to_string(),
            icon: "04d".to_string(),
            temperature: 28.4,
            feels_like: 31.0,
            temp_min: 27.0,
            temp_max: 29.5,
            humidity: 72,
            pressure,
            wind_speed,
            visibility: Some(10000),
            cloud_cover: 75,
            sunrise: 1760824800,
            sunset: 1760866800,
            observed_at: Some(1760850000),
            fetched_at: Utc::now(),
        })
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries, WeatherError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_wait(lat).await;

        if self.fail_forecast.load(Ordering::SeqCst) {
            return Err(WeatherError::Decode("missing field `list`".to_string()));
        }

        // Six days at 3-hour steps starting 2025-10-19 00:00 Taiwan time
        let start = 1760803200;
        let entries = (0..48)
            .map(|step| ForecastEntry {
                timestamp: start + step * 3 * 3600,
                condition: WeatherCondition::Rain,
                description: "小雨".to_string(),
                icon: "10d".to_string(),
                temperature: 26.0,
                feels_like: 27.5,
                temp_min: 25.0,
                temp_max: 27.0,
                humidity: 85,
                pressure: 1010.0,
                wind_speed: 4.2,
                visibility: Some(8000),
                cloud_cover: 90,
            })
            .collect();

        Ok(ForecastSeries {
            place_name: Some(place_name(lat, lon)),
            entries,
            fetched_at: Utc::now(),
        })
    }
}
