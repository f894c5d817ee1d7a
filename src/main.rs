use anyhow::Result;
use chrono::Utc;
use eg_core::{Config, ConfigError};
use eg_dashboard::{AppServices, TyphoonModel, WeatherModel};
use eg_weather::{format_date, format_temperature, format_time, icon_url};

fn print_weather(model: &WeatherModel) {
    if let Some(message) = model.error_message() {
        eprintln!("{}", message);
        return;
    }
    let Some(snapshot) = model.snapshot() else {
        return;
    };

    let current = &snapshot.current;
    println!("{} ({})", snapshot.place.name, snapshot.place.english_name);
    println!(
        "  {}  {} (體感 {})",
        current.description,
        format_temperature(current.temperature),
        format_temperature(current.feels_like)
    );
    println!(
        "  最低 {} / 最高 {}",
        format_temperature(current.temp_min),
        format_temperature(current.temp_max)
    );
    println!(
        "  濕度 {}%  風速 {:.0} km/h  氣壓 {} hPa",
        current.humidity,
        current.wind_speed_kmh(),
        current.pressure
    );
    if let Some(visibility) = current.visibility {
        println!("  能見度 {:.1} km", f64::from(visibility) / 1000.0);
    }
    println!(
        "  日出 {}  日落 {}",
        format_time(current.sunrise),
        format_time(current.sunset)
    );
    println!("  圖示 {}", icon_url(&current.icon));

    println!("\n五日預報");
    for entry in snapshot.daily_forecast() {
        println!(
            "  {}  {}  {}",
            format_date(entry.timestamp),
            format_temperature(entry.temperature),
            entry.description
        );
    }

    if let Some(updated) = model.last_update_text(Utc::now()) {
        println!("\n{}", updated);
    }
}

fn print_typhoons(model: &TyphoonModel) {
    println!("\n颱風動態");
    if let Some(message) = model.state().error() {
        eprintln!("  {}", message);
        return;
    }

    let observations = model.observations();
    if observations.is_empty() {
        println!("  目前無颱風活動");
    }
    for obs in observations {
        println!(
            "  [{}] {} {} @ {}  {} km/h  {} hPa  距台灣 {:.0} km",
            obs.status.label(),
            obs.intensity.label(),
            obs.name,
            obs.checkpoint,
            obs.wind_speed_kmh,
            obs.pressure_hpa,
            obs.distance_to_taiwan_km
        );
    }
    if model.failed_checkpoints() > 0 {
        println!("  ({} 個觀測點無法取得資料)", model.failed_checkpoints());
    }
    println!("  雨量圖層 {}", model.overlay_url(Utc::now()));
}

#[tokio::main]
async fn main() -> Result<()> {
    eg_core::init()?;

    let (config, _) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                eprintln!("{}", config_err.user_message());
            }
            return Err(e.context("Failed to load configuration"));
        }
    };
    tracing::info!("Config loaded from {}", Config::config_path().display());

    let services = AppServices::from_config(config, tokio::runtime::Handle::current())?;

    let mut weather = services.weather_model();
    match std::env::args().nth(1) {
        Some(name) => {
            weather.select_by_name(&name)?;
        }
        None => weather.select_place(services.default_place()),
    }

    let mut typhoon = services.typhoon_model();
    typhoon.refresh();

    weather.settle().await;
    print_weather(&weather);

    typhoon.wait_for_update().await;
    print_typhoons(&typhoon);

    services.shutdown();
    Ok(())
}
