//! OpenWeatherMap client for current conditions and the 5-day forecast.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{ApiCurrentResponse, ApiForecastResponse, CurrentConditions, ForecastSeries};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Anything that can answer current-conditions and forecast queries.
///
/// `WeatherClient` is the real implementation; the typhoon scanner and the
/// dashboard models only see this trait.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError>;

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries, WeatherError>;
}

#[async_trait]
impl<S: WeatherSource + ?Sized> WeatherSource for Arc<S> {
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError> {
        (**self).fetch_current(lat, lon).await
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries, WeatherError> {
        (**self).fetch_forecast(lat, lon).await
    }
}

/// Connection settings for [`WeatherClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub units: String,
    pub lang: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    /// Metric units, Traditional Chinese descriptions, default endpoint.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: "metric".to_string(),
            lang: "zh_tw".to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    settings: ClientSettings,
}

impl WeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WeatherError::Client(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Client against a non-default endpoint (mock servers, proxies).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        Self::new(ClientSettings::new(api_key).with_base_url(base_url))
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint_url(&self, endpoint: &str, lat: f64, lon: f64) -> String {
        format!(
            "{}/{}?lat={}&lon={}&appid={}&units={}&lang={}",
            self.settings.base_url,
            endpoint,
            lat,
            lon,
            self.settings.api_key,
            self.settings.units,
            self.settings.lang,
        )
    }

    /// One GET, no retry. Non-2xx is a network error, a bad body a decode error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        lat: f64,
        lon: f64,
    ) -> Result<T, WeatherError> {
        let url = self.endpoint_url(endpoint, lat, lon);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} endpoint returned status {}", endpoint, status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("{} response did not decode: {}", endpoint, e);
            WeatherError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    /// Current conditions at a coordinate.
    #[instrument(skip(self), level = "info")]
    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError> {
        let raw: ApiCurrentResponse = self.get_json("weather", lat, lon).await?;
        CurrentConditions::from_api(raw)
    }

    /// 3-hourly forecast at a coordinate.
    #[instrument(skip(self), level = "info")]
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries, WeatherError> {
        let raw: ApiForecastResponse = self.get_json("forecast", lat, lon).await?;
        ForecastSeries::from_api(raw)
    }
}

/// Location of the provider's icon for `code`, e.g. `10d`.
pub fn icon_url(code: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, code)
}
