pub mod typhoon_model;
pub mod weather_model;

pub use typhoon_model::{OverlaySettings, TyphoonModel};
pub use weather_model::WeatherModel;
