use std::sync::Arc;

use chrono::Utc;
use eg_weather::WeatherSource;
use futures::future::join_all;
use tracing::instrument;

use crate::checkpoints::{Checkpoint, CHECKPOINTS};
use crate::heuristic::observe;
use crate::types::{CheckpointOutcome, TropicalSystemObservation, TyphoonScan};

/// Polls every checkpoint concurrently and turns storm-like readings into
/// observations.
pub struct TyphoonScanner {
    source: Arc<dyn WeatherSource>,
    checkpoints: Vec<Checkpoint>,
}

impl TyphoonScanner {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self::with_checkpoints(source, CHECKPOINTS.to_vec())
    }

    pub fn with_checkpoints(source: Arc<dyn WeatherSource>, checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            source,
            checkpoints,
        }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Query all checkpoints and wait for every one to settle.
    ///
    /// A failing checkpoint is logged and recorded as
    /// [`CheckpointOutcome::Failed`]; it never aborts the others. Observations
    /// keep checkpoint order regardless of response order.
    #[instrument(skip(self), level = "info")]
    pub async fn scan(&self) -> TyphoonScan {
        let requests = self.checkpoints.iter().map(|checkpoint| {
            let source = Arc::clone(&self.source);
            let lat = checkpoint.coordinate.latitude;
            let lon = checkpoint.coordinate.longitude;
            async move { source.fetch_current(lat, lon).await }
        });
        let results = join_all(requests).await;

        let now = Utc::now();
        let mut scan = TyphoonScan::default();

        for (checkpoint, result) in self.checkpoints.iter().zip(results) {
            let outcome = match result {
                Ok(current) => match observe(&current, checkpoint, now) {
                    Some(observation) => {
                        tracing::info!(
                            "{} at {}: {} km/h, {} hPa",
                            observation.intensity.label(),
                            checkpoint.label,
                            observation.wind_speed_kmh,
                            observation.pressure_hpa
                        );
                        scan.observations.push(observation);
                        CheckpointOutcome::Detected(scan.observations.len() - 1)
                    }
                    None => CheckpointOutcome::Calm,
                },
                Err(e) => {
                    tracing::warn!("Checkpoint {} failed: {}", checkpoint.code, e);
                    CheckpointOutcome::Failed(e.to_string())
                }
            };
            scan.outcomes.push((checkpoint.code, outcome));
        }

        if scan.all_failed() {
            tracing::warn!("Every typhoon checkpoint failed; result is not meaningful");
        }

        scan
    }

    /// Observations only. Failures collapse to "nothing detected".
    pub async fn check_for_typhoons(&self) -> Vec<TropicalSystemObservation> {
        self.scan().await.observations
    }
}
