use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;
use crate::format::DISPLAY_TZ;
use crate::geo::Coordinate;

/// Weather condition categories mapped from the provider's `weather[0].main`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    /// Mist, fog and haze
    Mist,
    #[default]
    Other,
}

impl WeatherCondition {
    /// Map OpenWeatherMap's `main` group name onto our vocabulary.
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" | "fog" | "haze" => Self::Mist,
            _ => Self::Other,
        }
    }

    /// Short Traditional Chinese label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "晴朗",
            Self::Clouds => "多雲",
            Self::Rain => "下雨",
            Self::Drizzle => "毛毛雨",
            Self::Thunderstorm => "雷雨",
            Self::Snow => "下雪",
            Self::Mist => "霧",
            Self::Other => "其他",
        }
    }

    /// Rain-like conditions share a backdrop
    pub fn is_wet(&self) -> bool {
        matches!(self, Self::Rain | Self::Drizzle | Self::Thunderstorm)
    }
}

// ---- Provider response shapes ----

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiWeather {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiClouds {
    #[serde(default)]
    pub all: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiSys {
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// `/weather` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCurrentResponse {
    pub id: i64,
    pub name: String,
    pub coord: ApiCoord,
    pub weather: Vec<ApiWeather>,
    pub main: ApiMain,
    pub wind: ApiWind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub clouds: ApiClouds,
    #[serde(default)]
    pub sys: ApiSys,
    #[serde(default)]
    pub dt: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiForecastEntry {
    pub dt: i64,
    pub weather: Vec<ApiWeather>,
    pub main: ApiMain,
    pub wind: ApiWind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub clouds: ApiClouds,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCity {
    pub name: String,
}

/// `/forecast` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiForecastResponse {
    pub list: Vec<ApiForecastEntry>,
    #[serde(default)]
    pub city: Option<ApiCity>,
}

fn primary_weather(weather: Vec<ApiWeather>) -> Result<ApiWeather, WeatherError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode("empty `weather` array".to_string()))
}

// ---- Domain types ----

/// A snapshot of current conditions at one place.
///
/// Built fresh from every fetch; a new fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Provider's station/city id
    pub id: i64,
    /// Place name as resolved by the provider
    pub place_name: String,
    pub coordinate: Coordinate,
    pub condition: WeatherCondition,
    pub description: String,
    pub icon: String,
    /// Celsius
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Percent
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    /// Meters; absent for some stations
    pub visibility: Option<u32>,
    /// Percent
    pub cloud_cover: u8,
    /// Epoch seconds
    pub sunrise: i64,
    pub sunset: i64,
    /// Provider observation time, epoch seconds
    pub observed_at: Option<i64>,
    pub fetched_at: DateTime<Utc>,
}

impl CurrentConditions {
    pub(crate) fn from_api(raw: ApiCurrentResponse) -> Result<Self, WeatherError> {
        let weather = primary_weather(raw.weather)?;
        Ok(Self {
            id: raw.id,
            place_name: raw.name,
            coordinate: Coordinate::new(raw.coord.lat, raw.coord.lon),
            condition: WeatherCondition::from_main(&weather.main),
            description: weather.description,
            icon: weather.icon,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.speed,
            visibility: raw.visibility,
            cloud_cover: raw.clouds.all,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
            observed_at: raw.dt,
            fetched_at: Utc::now(),
        })
    }

    /// Wind speed in km/h
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }

    /// True between sunrise (inclusive) and sunset (exclusive).
    pub fn is_daytime_at(&self, epoch_secs: i64) -> bool {
        self.sunrise <= epoch_secs && epoch_secs < self.sunset
    }
}

/// One 3-hour step of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds
    pub timestamp: i64,
    pub condition: WeatherCondition,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub wind_speed: f64,
    pub visibility: Option<u32>,
    pub cloud_cover: u8,
}

impl ForecastEntry {
    fn from_api(raw: ApiForecastEntry) -> Result<Self, WeatherError> {
        let weather = primary_weather(raw.weather)?;
        Ok(Self {
            timestamp: raw.dt,
            condition: WeatherCondition::from_main(&weather.main),
            description: weather.description,
            icon: weather.icon,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.speed,
            visibility: raw.visibility,
            cloud_cover: raw.clouds.all,
        })
    }

    /// Calendar date of this entry in Taiwan time
    pub fn local_date(&self) -> Option<NaiveDate> {
        DISPLAY_TZ
            .timestamp_opt(self.timestamp, 0)
            .single()
            .map(|dt| dt.date_naive())
    }
}

/// Ordered 3-hourly forecast, typically five days deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub place_name: Option<String>,
    pub entries: Vec<ForecastEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl ForecastSeries {
    pub(crate) fn from_api(raw: ApiForecastResponse) -> Result<Self, WeatherError> {
        let entries = raw
            .list
            .into_iter()
            .map(ForecastEntry::from_api)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            place_name: raw.city.map(|c| c.name),
            entries,
            fetched_at: Utc::now(),
        })
    }

    /// Approximate a daily forecast: the first entry of each calendar day
    /// (Taiwan time), in order, at most `max_days` of them.
    pub fn daily(&self, max_days: usize) -> Vec<&ForecastEntry> {
        let mut days: Vec<&ForecastEntry> = Vec::new();
        let mut last_date: Option<NaiveDate> = None;

        for entry in &self.entries {
            let Some(date) = entry.local_date() else {
                continue;
            };
            if last_date == Some(date) {
                continue;
            }
            if days.len() == max_days {
                break;
            }
            last_date = Some(date);
            days.push(entry);
        }

        days
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
