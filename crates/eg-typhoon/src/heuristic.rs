//! Thresholds and derivations that turn one reading into an observation.

use chrono::{DateTime, Utc};
use eg_weather::{CurrentConditions, Coordinate};

use crate::checkpoints::Checkpoint;
use crate::types::{AlertStatus, Intensity, TropicalSystemObservation};

/// Reference point for "distance to Taiwan".
pub const TAIWAN_REFERENCE: Coordinate = Coordinate::new(23.8, 121.0);

/// Wind must be strictly above this (m/s, roughly 62 km/h).
pub const MIN_WIND_SPEED_MS: f64 = 17.2;
/// Pressure must be strictly below this (hPa).
pub const MAX_PRESSURE_HPA: f64 = 1000.0;

const WARNING_RADIUS_KM: f64 = 500.0;
const WARNING_MIN_WIND_KMH: f64 = 118.0;
const WATCH_RADIUS_KM: f64 = 800.0;
const WATCH_MIN_WIND_KMH: f64 = 62.0;

/// Display stand-ins picked by coordinates. These are NOT the names of real
/// storms; a detection is never matched against an official advisory.
const SYNTHETIC_NAMES: [&str; 20] = [
    "瑪娃", "古超", "泰利", "杜蘇芮", "卡努", "蘭恩", "蘇拉", "海葵", "小犬", "布拉萬",
    "珊瑚", "瑪瑙", "托卡基", "哈格比", "巴威", "美莎克", "海神", "紅霞", "白海豚", "鯨魚",
];

/// Wind above 17.2 m/s and pressure below 1000 hPa; both strict.
pub fn is_tropical_system(current: &CurrentConditions) -> bool {
    current.wind_speed > MIN_WIND_SPEED_MS && current.pressure < MAX_PRESSURE_HPA
}

/// Class by sustained wind in km/h. Lower bounds are inclusive.
pub fn classify_intensity(wind_kmh: f64) -> Intensity {
    if wind_kmh >= 220.0 {
        Intensity::SuperTyphoon
    } else if wind_kmh >= 185.0 {
        Intensity::SevereTyphoon
    } else if wind_kmh >= 150.0 {
        Intensity::ModerateTyphoon
    } else if wind_kmh >= 118.0 {
        Intensity::MildTyphoon
    } else if wind_kmh >= 62.0 {
        Intensity::TropicalStorm
    } else {
        Intensity::TropicalDepression
    }
}

pub fn distance_to_taiwan_km(coordinate: &Coordinate) -> f64 {
    TAIWAN_REFERENCE.distance_to(coordinate)
}

/// Warning when close and strong, watch when near and storm-force, else active.
pub fn determine_status(wind_kmh: f64, coordinate: &Coordinate) -> AlertStatus {
    let distance = distance_to_taiwan_km(coordinate);

    if distance < WARNING_RADIUS_KM && wind_kmh >= WARNING_MIN_WIND_KMH {
        AlertStatus::Warning
    } else if distance < WATCH_RADIUS_KM && wind_kmh >= WATCH_MIN_WIND_KMH {
        AlertStatus::Watch
    } else {
        AlertStatus::Active
    }
}

/// Deterministic pseudo-name for a coordinate: `floor((lat + lon) * 10) mod 20`.
///
/// Uses a euclidean remainder so western/southern coordinates still index
/// the table.
pub fn synthetic_name(lat: f64, lon: f64) -> &'static str {
    let bucket = ((lat + lon) * 10.0).floor() as i64;
    let index = bucket.rem_euclid(SYNTHETIC_NAMES.len() as i64) as usize;
    SYNTHETIC_NAMES[index]
}

/// Build an observation from one checkpoint's reading, or `None` if the
/// reading is below the thresholds.
///
/// Location, name, status and distance come from the coordinate the
/// provider reports, which can differ slightly from the checkpoint's.
pub fn observe(
    current: &CurrentConditions,
    checkpoint: &Checkpoint,
    now: DateTime<Utc>,
) -> Option<TropicalSystemObservation> {
    if !is_tropical_system(current) {
        return None;
    }

    let wind_kmh = current.wind_speed_kmh();
    let coordinate = current.coordinate;

    Some(TropicalSystemObservation {
        id: format!(
            "typhoon_{}_{}_{}",
            checkpoint.code,
            current.id,
            now.timestamp_millis()
        ),
        name: synthetic_name(coordinate.latitude, coordinate.longitude),
        checkpoint: checkpoint.label,
        coordinate,
        intensity: classify_intensity(wind_kmh),
        wind_speed_kmh: wind_kmh.round().max(0.0) as u32,
        pressure_hpa: current.pressure,
        status: determine_status(wind_kmh, &coordinate),
        distance_to_taiwan_km: distance_to_taiwan_km(&coordinate),
        observed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoints::CHECKPOINTS;
    use eg_weather::{WeatherCondition, EARTH_RADIUS_KM};

    /// A point due south of the reference at exactly `km` kilometers.
    fn south_of_taiwan(km: f64) -> Coordinate {
        let degrees = (km / EARTH_RADIUS_KM).to_degrees();
        Coordinate::new(TAIWAN_REFERENCE.latitude - degrees, TAIWAN_REFERENCE.longitude)
    }

    fn reading(coordinate: Coordinate, wind_ms: f64, pressure: f64) -> CurrentConditions {
        CurrentConditions {
            id: 42,
            place_name: String::new(),
            coordinate,
            condition: WeatherCondition::Rain,
            description: "大雨".to_string(),
            icon: "10d".to_string(),
            temperature: 27.0,
            feels_like: 30.0,
            temp_min: 26.0,
            temp_max: 28.0,
            humidity: 95,
            pressure,
            wind_speed: wind_ms,
            visibility: Some(2000),
            cloud_cover: 100,
            sunrise: 0,
            sunset: 0,
            observed_at: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_threshold_is_strict_on_wind() {
        let at = Coordinate::new(15.0, 140.0);
        assert!(!is_tropical_system(&reading(at, 17.2, 990.0)));
        assert!(is_tropical_system(&reading(at, 17.3, 999.0)));
    }

    #[test]
    fn test_threshold_is_strict_on_pressure() {
        let at = Coordinate::new(15.0, 140.0);
        assert!(!is_tropical_system(&reading(at, 30.0, 1000.0)));
        assert!(is_tropical_system(&reading(at, 30.0, 999.9)));
    }

    #[test]
    fn test_intensity_boundaries_inclusive() {
        assert_eq!(classify_intensity(220.0), Intensity::SuperTyphoon);
        assert_eq!(classify_intensity(219.9), Intensity::SevereTyphoon);
        assert_eq!(classify_intensity(185.0), Intensity::SevereTyphoon);
        assert_eq!(classify_intensity(150.0), Intensity::ModerateTyphoon);
        assert_eq!(classify_intensity(118.0), Intensity::MildTyphoon);
        assert_eq!(classify_intensity(117.9), Intensity::TropicalStorm);
        assert_eq!(classify_intensity(62.0), Intensity::TropicalStorm);
        assert_eq!(classify_intensity(61.9), Intensity::TropicalDepression);
        assert_eq!(classify_intensity(0.0), Intensity::TropicalDepression);
    }

    #[test]
    fn test_intensity_is_monotonic() {
        let mut previous = classify_intensity(0.0);
        for tenth in 0..3000 {
            let current = classify_intensity(tenth as f64 / 10.0);
            assert!(current >= previous, "dropped at {} km/h", tenth as f64 / 10.0);
            previous = current;
        }
    }

    #[test]
    fn test_status_warning_when_close_and_strong() {
        assert_eq!(
            determine_status(130.0, &south_of_taiwan(400.0)),
            AlertStatus::Warning
        );
    }

    #[test]
    fn test_status_watch_when_near_and_storm_force() {
        assert_eq!(
            determine_status(70.0, &south_of_taiwan(600.0)),
            AlertStatus::Watch
        );
        // Strong but outside the warning radius is still only a watch
        assert_eq!(
            determine_status(200.0, &south_of_taiwan(600.0)),
            AlertStatus::Watch
        );
    }

    #[test]
    fn test_status_active_when_far() {
        assert_eq!(
            determine_status(200.0, &south_of_taiwan(900.0)),
            AlertStatus::Active
        );
        // Close but too weak for either alert
        assert_eq!(
            determine_status(50.0, &south_of_taiwan(100.0)),
            AlertStatus::Active
        );
    }

    #[test]
    fn test_south_of_taiwan_helper_is_accurate() {
        let d = distance_to_taiwan_km(&south_of_taiwan(400.0));
        assert!((d - 400.0).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_synthetic_name_is_deterministic() {
        let first = synthetic_name(18.3, 125.7);
        for _ in 0..10 {
            assert_eq!(synthetic_name(18.3, 125.7), first);
        }
    }

    #[test]
    fn test_synthetic_name_indexing() {
        // floor((15 + 140) * 10) = 1550; 1550 mod 20 = 10
        assert_eq!(synthetic_name(15.0, 140.0), "珊瑚");
        // floor((20 + 135) * 10) = 1550 as well
        assert_eq!(synthetic_name(20.0, 135.0), "珊瑚");
        // floor(155.15 * 10) = 1551; 1551 mod 20 = 11
        assert_eq!(synthetic_name(15.15, 140.0), "瑪瑙");
    }

    #[test]
    fn test_synthetic_name_handles_negative_sums() {
        // floor(-1.55 * 10) = -16; rem_euclid(20) = 4
        assert_eq!(synthetic_name(-1.0, -0.55), "卡努");
    }

    #[test]
    fn test_observe_below_threshold_is_none() {
        let calm = reading(Coordinate::new(15.0, 140.0), 17.2, 990.0);
        assert!(observe(&calm, &CHECKPOINTS[0], Utc::now()).is_none());
    }

    #[test]
    fn test_observe_builds_observation() {
        let now = Utc::now();
        let coordinate = south_of_taiwan(400.0);
        // 130 km/h
        let storm = reading(coordinate, 130.0 / 3.6, 965.0);

        let obs = observe(&storm, &CHECKPOINTS[4], now).unwrap();
        assert_eq!(obs.status, AlertStatus::Warning);
        assert_eq!(obs.intensity, Intensity::MildTyphoon);
        assert_eq!(obs.wind_speed_kmh, 130);
        assert_eq!(obs.pressure_hpa, 965.0);
        assert_eq!(obs.checkpoint, "台灣東方海面");
        assert_eq!(obs.coordinate, coordinate);
        assert_eq!(obs.observed_at, now);
        assert_eq!(
            obs.id,
            format!("typhoon_taiwan-east_42_{}", now.timestamp_millis())
        );
        assert!((obs.distance_to_taiwan_km - 400.0).abs() < 1e-6);
    }
}
