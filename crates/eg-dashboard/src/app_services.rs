//! Shared dashboard services built once from configuration.
//!
//! `AppServices` owns the weather source, the typhoon scanner and a root
//! cancellation token. Models handed out by it run their background work
//! under child tokens, so `shutdown()` stops all of it at once.

use std::sync::Arc;
use std::time::Duration;

use eg_core::{AppError, Config};
use eg_typhoon::{OverlayTile, TyphoonScanner};
use eg_weather::{places, ClientSettings, Place, WeatherClient, WeatherSource};
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error_mapping::client_error;
use crate::models::{OverlaySettings, TyphoonModel, WeatherModel};

struct Backend {
    source: Arc<dyn WeatherSource>,
    scanner: Arc<TyphoonScanner>,
}

impl Backend {
    fn new(source: Arc<dyn WeatherSource>) -> Self {
        let scanner = Arc::new(TyphoonScanner::new(Arc::clone(&source)));
        Self { source, scanner }
    }
}

pub struct AppServices {
    runtime: Handle,
    config: RwLock<Config>,
    backend: RwLock<Backend>,
    default_place: RwLock<Place>,
    root_token: CancellationToken,
}

/// Client settings derived from the `[api]` section.
pub fn client_settings(config: &Config) -> ClientSettings {
    ClientSettings {
        api_key: config.api.effective_api_key(),
        base_url: config.api.base_url.trim_end_matches('/').to_string(),
        units: config.api.units.clone(),
        lang: config.api.lang.clone(),
        timeout: config.api.request_timeout_secs.map(Duration::from_secs),
    }
}

fn resolve_default_place(config: &Config) -> Result<Place, AppError> {
    let key = &config.dashboard.default_place;
    places::lookup(key).ok_or_else(|| eg_core::WeatherError::UnknownPlace(key.clone()).into())
}

fn build_client(config: &Config) -> Result<Arc<dyn WeatherSource>, AppError> {
    let client = WeatherClient::new(client_settings(config)).map_err(client_error)?;
    Ok(Arc::new(client))
}

impl AppServices {
    /// Build the real HTTP client from `config`.
    pub fn from_config(config: Config, runtime: Handle) -> Result<Self, AppError> {
        let source = build_client(&config)?;
        Self::with_source(config, source, runtime)
    }

    /// Use an existing weather source (tests, alternate providers).
    pub fn with_source(
        config: Config,
        source: Arc<dyn WeatherSource>,
        runtime: Handle,
    ) -> Result<Self, AppError> {
        let default_place = resolve_default_place(&config)?;
        tracing::info!(
            "Dashboard services ready, default place {}",
            default_place.english_name
        );

        Ok(Self {
            runtime,
            config: RwLock::new(config),
            backend: RwLock::new(Backend::new(source)),
            default_place: RwLock::new(default_place),
            root_token: CancellationToken::new(),
        })
    }

    pub fn runtime(&self) -> Handle {
        self.runtime.clone()
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn default_place(&self) -> Place {
        *self.default_place.read()
    }

    pub fn source(&self) -> Arc<dyn WeatherSource> {
        Arc::clone(&self.backend.read().source)
    }

    pub fn scanner(&self) -> Arc<TyphoonScanner> {
        Arc::clone(&self.backend.read().scanner)
    }

    /// Rebuild the client after a configuration change. Models created
    /// before the call keep the source they were built with.
    pub fn reconfigure(&self, config: Config) -> Result<(), AppError> {
        let default_place = resolve_default_place(&config)?;
        let source = build_client(&config)?;

        *self.backend.write() = Backend::new(source);
        *self.default_place.write() = default_place;
        *self.config.write() = config;
        tracing::info!("Dashboard services reconfigured");
        Ok(())
    }

    pub fn weather_model(&self) -> WeatherModel {
        WeatherModel::new(self.source(), self.runtime())
    }

    pub fn typhoon_model(&self) -> TyphoonModel {
        let config = self.config.read();
        let overlay = OverlaySettings {
            maps_base_url: config.api.maps_base_url.clone(),
            api_key: config.api.effective_api_key(),
            tile: OverlayTile {
                zoom: config.typhoon.overlay_zoom,
                x: config.typhoon.overlay_x,
                y: config.typhoon.overlay_y,
            },
        };
        let poll_interval = Duration::from_secs(u64::from(config.typhoon.poll_minutes) * 60);

        TyphoonModel::new(
            self.scanner(),
            self.runtime(),
            poll_interval,
            overlay,
            self.root_token.child_token(),
        )
    }

    /// Cancel all background work started through these services.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.root_token.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root_token.is_cancelled()
    }
}
