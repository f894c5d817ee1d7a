use std::sync::Arc;

use chrono::{DateTime, Utc};
use eg_core::{AppError, FetchState};
use eg_weather::{format_last_update, places, Place, WeatherSource};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::services::{request_weather_fetch, WeatherServiceMessage, WeatherSnapshot};

/// View-model for the selected place's current conditions and forecast.
///
/// Every request is tagged with a generation number. A response whose
/// generation is not the latest is discarded, so a quick re-selection can't
/// be overwritten by the slower earlier request.
pub struct WeatherModel {
    source: Arc<dyn WeatherSource>,
    runtime: Handle,
    selected: Option<Place>,
    state: FetchState<WeatherSnapshot>,
    generation: u64,
    last_update: Option<DateTime<Utc>>,
    tx: UnboundedSender<WeatherServiceMessage>,
    rx: UnboundedReceiver<WeatherServiceMessage>,
}

impl WeatherModel {
    pub fn new(source: Arc<dyn WeatherSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            selected: None,
            state: FetchState::Idle,
            generation: 0,
            last_update: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FetchState<WeatherSnapshot> {
        &self.state
    }

    pub fn selected_place(&self) -> Option<Place> {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.state.data()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error()
    }

    /// When the last successful fetch was applied.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Relative "updated N minutes ago" text, if anything has loaded.
    pub fn last_update_text(&self, now: DateTime<Utc>) -> Option<String> {
        self.last_update.map(|at| format_last_update(at, now))
    }

    /// Select a place and start loading it. Any in-flight request is
    /// superseded.
    pub fn select_place(&mut self, place: Place) {
        tracing::info!("Selected {} ({})", place.name, place.english_name);
        self.selected = Some(place);
        self.start_fetch(place);
    }

    /// Select by display name or English alias.
    pub fn select_by_name(&mut self, key: &str) -> Result<Place, AppError> {
        let place = places::lookup(key)
            .ok_or_else(|| eg_core::WeatherError::UnknownPlace(key.to_string()))?;
        self.select_place(place);
        Ok(place)
    }

    /// Re-issue both requests for the current selection. Returns false if
    /// nothing is selected yet.
    pub fn retry(&mut self) -> bool {
        match self.selected {
            Some(place) => {
                tracing::info!("Retrying weather fetch for {}", place.name);
                self.start_fetch(place);
                true
            }
            None => false,
        }
    }

    fn start_fetch(&mut self, place: Place) {
        self.generation += 1;
        self.state = std::mem::replace(&mut self.state, FetchState::Idle).on_request();

        request_weather_fetch(
            &self.tx,
            &self.runtime,
            Arc::clone(&self.source),
            place,
            self.generation,
        );
    }

    /// Apply every result that has already arrived. Returns true if the
    /// state changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.apply(msg);
        }
        changed
    }

    /// Wait for the next result and apply it. Returns true if it changed
    /// the state, false if it was stale.
    pub async fn wait_for_update(&mut self) -> bool {
        // The model holds a sender, so the channel never closes here
        match self.rx.recv().await {
            Some(msg) => self.apply(msg),
            None => false,
        }
    }

    /// Wait until the latest request has settled.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            self.wait_for_update().await;
        }
    }

    fn apply(&mut self, msg: WeatherServiceMessage) -> bool {
        match msg {
            WeatherServiceMessage::FetchDone { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Discarding stale weather response {} (current {})",
                        generation,
                        self.generation
                    );
                    return false;
                }

                let result = result.map_err(|e| {
                    tracing::error!("Failed to fetch weather: {}", e);
                    AppError::from(e).user_message().to_string()
                });
                if result.is_ok() {
                    self.last_update = Some(Utc::now());
                }
                self.state = std::mem::replace(&mut self.state, FetchState::Idle).on_complete(result);
                true
            }
        }
    }
}
