//! Simplified typhoon tracking for the Western Pacific.
//!
//! Polls current conditions at a handful of fixed checkpoints and flags any
//! checkpoint whose wind and pressure look like a tropical system. Each
//! flagged checkpoint becomes a [`TropicalSystemObservation`] with a
//! synthetic name, an intensity class and an alert status relative to
//! Taiwan. Observations are rebuilt from scratch on every poll.

pub mod checkpoints;
pub mod heuristic;
pub mod overlay;
pub mod scanner;
pub mod types;

pub use checkpoints::{Checkpoint, CHECKPOINTS};
pub use heuristic::{
    classify_intensity, determine_status, distance_to_taiwan_km, is_tropical_system, observe,
    synthetic_name, TAIWAN_REFERENCE,
};
pub use overlay::{overlay_tile_url, OverlayTile, DEFAULT_MAPS_BASE_URL};
pub use scanner::TyphoonScanner;
pub use types::{AlertStatus, CheckpointOutcome, Intensity, TropicalSystemObservation, TyphoonScan};
