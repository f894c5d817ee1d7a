use chrono::{DateTime, Utc};
use eg_weather::Coordinate;
use serde::Serialize;

/// Intensity class by sustained wind, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    TropicalDepression,
    TropicalStorm,
    MildTyphoon,
    ModerateTyphoon,
    SevereTyphoon,
    SuperTyphoon,
}

impl Intensity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TropicalDepression => "熱帶低壓",
            Self::TropicalStorm => "熱帶風暴",
            Self::MildTyphoon => "輕度颱風",
            Self::ModerateTyphoon => "中度颱風",
            Self::SevereTyphoon => "強烈颱風",
            Self::SuperTyphoon => "超強颱風",
        }
    }
}

/// Alert level relative to Taiwan, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Detected, but neither close nor strong enough for a watch
    Active,
    Watch,
    Warning,
}

impl AlertStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "活動中",
            Self::Watch => "注意",
            Self::Warning => "警報",
        }
    }
}

/// A storm-like reading at one checkpoint during one poll.
///
/// `id` and `name` are synthetic. The id changes every poll and the name is
/// derived from coordinates, not an official storm name, so the same real
/// system shows up as a new entity on each poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TropicalSystemObservation {
    pub id: String,
    pub name: &'static str,
    /// Label of the checkpoint that produced this reading
    pub checkpoint: &'static str,
    pub coordinate: Coordinate,
    pub intensity: Intensity,
    /// Rounded to whole km/h
    pub wind_speed_kmh: u32,
    pub pressure_hpa: f64,
    pub status: AlertStatus,
    pub distance_to_taiwan_km: f64,
    pub observed_at: DateTime<Utc>,
}

/// What happened at one checkpoint during a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckpointOutcome {
    /// Thresholds crossed; index into `TyphoonScan::observations`
    Detected(usize),
    /// Fetched fine, nothing storm-like
    Calm,
    /// Fetch failed; the reason is for logs only
    Failed(String),
}

/// Full result of one scan.
#[derive(Debug, Clone, Default)]
pub struct TyphoonScan {
    /// In checkpoint order
    pub observations: Vec<TropicalSystemObservation>,
    /// One entry per checkpoint, paired with its code
    pub outcomes: Vec<(&'static str, CheckpointOutcome)>,
}

impl TyphoonScan {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, CheckpointOutcome::Failed(_)))
            .count()
    }

    /// Every checkpoint failed, so an empty observation list means nothing.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_count() == self.outcomes.len()
    }

    /// Most severe status among the observations.
    pub fn highest_status(&self) -> Option<AlertStatus> {
        self.observations.iter().map(|o| o.status).max()
    }
}
