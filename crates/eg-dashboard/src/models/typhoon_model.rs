use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use eg_core::{AppError, FetchState};
use eg_typhoon::{AlertStatus, OverlayTile, TropicalSystemObservation, TyphoonScanner};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::services::{request_typhoon_scan, TyphoonServiceMessage, TyphoonWatcher};

/// Where overlay tiles come from.
#[derive(Debug, Clone)]
pub struct OverlaySettings {
    pub maps_base_url: String,
    pub api_key: String,
    pub tile: OverlayTile,
}

/// View-model for the typhoon panel.
///
/// While active, a [`TyphoonWatcher`] rescans on a fixed interval. Each
/// scan replaces the observation list wholesale.
pub struct TyphoonModel {
    scanner: Arc<TyphoonScanner>,
    runtime: Handle,
    poll_interval: Duration,
    overlay: OverlaySettings,
    parent_token: CancellationToken,
    state: FetchState<Vec<TropicalSystemObservation>>,
    /// Settled state before the current request, restored if it is abandoned
    before_request: FetchState<Vec<TropicalSystemObservation>>,
    refreshes_in_flight: usize,
    failed_checkpoints: usize,
    last_update: Option<DateTime<Utc>>,
    watcher: Option<TyphoonWatcher>,
    tx: UnboundedSender<TyphoonServiceMessage>,
    rx: UnboundedReceiver<TyphoonServiceMessage>,
}

impl TyphoonModel {
    pub fn new(
        scanner: Arc<TyphoonScanner>,
        runtime: Handle,
        poll_interval: Duration,
        overlay: OverlaySettings,
        parent_token: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            scanner,
            runtime,
            poll_interval,
            overlay,
            parent_token,
            state: FetchState::Idle,
            before_request: FetchState::Idle,
            refreshes_in_flight: 0,
            failed_checkpoints: 0,
            last_update: None,
            watcher: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FetchState<Vec<TropicalSystemObservation>> {
        &self.state
    }

    /// Observations from the last successful scan, in checkpoint order.
    pub fn observations(&self) -> &[TropicalSystemObservation] {
        self.state.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn highest_status(&self) -> Option<AlertStatus> {
        self.observations().iter().map(|o| o.status).max()
    }

    /// Checkpoints that failed in the last successful scan.
    pub fn failed_checkpoints(&self) -> usize {
        self.failed_checkpoints
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn is_active(&self) -> bool {
        self.watcher.as_ref().is_some_and(TyphoonWatcher::is_running)
    }

    /// Overlay tile URL for `now`.
    pub fn overlay_url(&self, now: DateTime<Utc>) -> String {
        self.overlay
            .tile
            .url(&self.overlay.maps_base_url, &self.overlay.api_key, now.timestamp())
    }

    /// The typhoon view became visible: scan now and keep polling.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }
        if self.parent_token.is_cancelled() {
            tracing::warn!("Typhoon view activated after shutdown; not polling");
            return;
        }

        self.begin_request();
        self.watcher = Some(TyphoonWatcher::spawn(
            &self.runtime,
            Arc::clone(&self.scanner),
            self.poll_interval,
            self.parent_token.child_token(),
            self.tx.clone(),
        ));
    }

    /// The typhoon view was hidden: stop polling.
    ///
    /// A watcher scan cut short never reports, so unless a refresh is still
    /// running the state goes back to what it was before the request.
    pub fn deactivate(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.cancel();
            self.poll_channel();
            if self.state.is_loading() && self.refreshes_in_flight == 0 {
                self.state = std::mem::replace(&mut self.before_request, FetchState::Idle);
            }
            tracing::info!("Typhoon view deactivated");
        }
    }

    /// One scan outside the regular schedule.
    pub fn refresh(&mut self) {
        self.begin_request();
        self.refreshes_in_flight += 1;
        request_typhoon_scan(&self.tx, &self.runtime, Arc::clone(&self.scanner));
    }

    fn begin_request(&mut self) {
        if !self.state.is_loading() {
            self.before_request = self.state.clone();
        }
        self.state = std::mem::replace(&mut self.state, FetchState::Idle).on_request();
    }

    /// Apply every scan that has already finished.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            changed = true;
        }
        changed
    }

    /// Wait for the next scan and apply it.
    pub async fn wait_for_update(&mut self) {
        if let Some(msg) = self.rx.recv().await {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: TyphoonServiceMessage) {
        let result = match msg {
            TyphoonServiceMessage::RefreshDone(result) => {
                self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
                result
            }
            TyphoonServiceMessage::ScanDone(result) => result,
        };

        let result = match result {
            Ok(scan) => {
                self.failed_checkpoints = scan.failed_count();
                self.last_update = Some(Utc::now());
                tracing::info!(
                    "Typhoon scan: {} detected, {} checkpoint(s) failed",
                    scan.observations.len(),
                    scan.failed_count()
                );
                Ok(scan.observations)
            }
            Err(e) => {
                tracing::error!("Typhoon scan failed: {}", e);
                Err(AppError::from(e).user_message().to_string())
            }
        };
        self.state = std::mem::replace(&mut self.state, FetchState::Idle).on_complete(result);
    }
}

impl Drop for TyphoonModel {
    fn drop(&mut self) {
        self.deactivate();
    }
}
