//! Tile address for the precipitation-accumulation map overlay.

pub const DEFAULT_MAPS_BASE_URL: &str = "http://maps.openweathermap.org/maps/2.0/weather";
const LAYER: &str = "TA2";
const OPACITY: &str = "0.9";

/// One tile in the provider's XYZ scheme. The default frames the sea
/// around Taiwan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTile {
    pub zoom: u32,
    pub x: u32,
    pub y: u32,
}

impl Default for OverlayTile {
    fn default() -> Self {
        Self {
            zoom: 6,
            x: 54,
            y: 25,
        }
    }
}

impl OverlayTile {
    pub fn url(&self, maps_base_url: &str, api_key: &str, unix_ts: i64) -> String {
        overlay_tile_url(maps_base_url, api_key, self.zoom, self.x, self.y, unix_ts)
    }
}

/// Build the overlay tile URL for a moment in time.
pub fn overlay_tile_url(
    maps_base_url: &str,
    api_key: &str,
    zoom: u32,
    x: u32,
    y: u32,
    unix_ts: i64,
) -> String {
    format!(
        "{}/{}/{}/{}/{}?date={}&opacity={}&fill_bound=true&appid={}",
        maps_base_url.trim_end_matches('/'),
        LAYER,
        zoom,
        x,
        y,
        unix_ts,
        OPACITY,
        api_key
    )
}
