//! Display formatting shared by every view.
//!
//! Output mirrors the zh-TW locale's short forms in Taiwan time.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Time zone used for all displayed times and day grouping.
pub const DISPLAY_TZ: Tz = chrono_tz::Asia::Taipei;

/// Round to the nearest whole degree (halves round up) and append `°C`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius) as i64)
}

/// Nearest integer, halves toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    let rounded = (x + 0.5).floor();
    // x + 0.5 can round up past a half, e.g. for 0.49999999999999994
    if rounded - 0.5 > x {
        rounded - 1.0
    } else {
        rounded
    }
}

/// Short 12-hour time, e.g. `上午09:05` or `下午02:30`.
///
/// Returns an empty string for timestamps chrono can't represent.
pub fn format_time(epoch_secs: i64) -> String {
    let Some(local) = DISPLAY_TZ.timestamp_opt(epoch_secs, 0).single() else {
        return String::new();
    };
    let period = if local.hour() < 12 { "上午" } else { "下午" };
    format!("{}{}", period, local.format("%I:%M"))
}

/// Short month/day, e.g. `10月19日`.
pub fn format_date(epoch_secs: i64) -> String {
    let Some(local) = DISPLAY_TZ.timestamp_opt(epoch_secs, 0).single() else {
        return String::new();
    };
    format!("{}月{}日", local.month(), local.day())
}

/// Relative "last updated" label.
pub fn format_last_update(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - updated_at).num_minutes();

    if minutes < 1 {
        return "剛剛更新".to_string();
    }
    if minutes < 60 {
        return format!("{}分鐘前更新", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}小時前更新", hours);
    }

    format!("{}天前更新", hours / 24)
}
