//! Taiwan counties and cities the dashboard can show.
//!
//! Static reference data, loaded once and never mutated.

use serde::Serialize;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    Central,
    South,
    East,
    OutlyingIslands,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Central,
        Region::South,
        Region::East,
        Region::OutlyingIslands,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "北部地區",
            Region::Central => "中部地區",
            Region::South => "南部地區",
            Region::East => "東部地區",
            Region::OutlyingIslands => "離島地區",
        }
    }
}

/// A named place used as the query key for weather data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Place {
    /// Display name, e.g. `台北市`
    pub name: &'static str,
    /// English alias, e.g. `Taipei`
    pub english_name: &'static str,
    pub coordinate: Coordinate,
    pub region: Region,
}

const fn place(
    name: &'static str,
    english_name: &'static str,
    latitude: f64,
    longitude: f64,
    region: Region,
) -> Place {
    Place {
        name,
        english_name,
        coordinate: Coordinate::new(latitude, longitude),
        region,
    }
}

pub const PLACES: [Place; 22] = [
    place("基隆市", "Keelung", 25.1276, 121.7392, Region::North),
    place("台北市", "Taipei", 25.0330, 121.5654, Region::North),
    place("新北市", "New Taipei", 25.0173, 121.4644, Region::North),
    place("桃園市", "Taoyuan", 24.9937, 121.3009, Region::North),
    place("新竹市", "Hsinchu", 24.8138, 120.9675, Region::North),
    place("新竹縣", "Hsinchu County", 24.8387, 121.0177, Region::North),
    place("苗栗縣", "Miaoli", 24.5602, 120.8214, Region::Central),
    place("台中市", "Taichung", 24.1477, 120.6736, Region::Central),
    place("彰化縣", "Changhua", 24.0518, 120.5161, Region::Central),
    place("南投縣", "Nantou", 23.9609, 120.9719, Region::Central),
    place("雲林縣", "Yunlin", 23.7092, 120.4313, Region::Central),
    place("嘉義市", "Chiayi", 23.4801, 120.4491, Region::South),
    place("嘉義縣", "Chiayi County", 23.4518, 120.2554, Region::South),
    place("台南市", "Tainan", 22.9998, 120.2269, Region::South),
    place("高雄市", "Kaohsiung", 22.6273, 120.3014, Region::South),
    place("屏東縣", "Pingtung", 22.5519, 120.5487, Region::South),
    place("宜蘭縣", "Yilan", 24.7021, 121.7378, Region::East),
    place("花蓮縣", "Hualien", 23.9871, 121.6015, Region::East),
    place("台東縣", "Taitung", 22.7972, 121.1713, Region::East),
    place("澎湖縣", "Penghu", 23.5711, 119.5798, Region::OutlyingIslands),
    place("金門縣", "Kinmen", 24.4495, 118.3770, Region::OutlyingIslands),
    place("連江縣", "Lienchiang", 26.1605, 119.9297, Region::OutlyingIslands),
];

pub fn all() -> &'static [Place] {
    &PLACES
}

pub fn find_by_name(name: &str) -> Option<Place> {
    PLACES.iter().copied().find(|p| p.name == name)
}

/// Case-insensitive lookup on the English alias.
pub fn find_by_english_name(english_name: &str) -> Option<Place> {
    PLACES
        .iter()
        .copied()
        .find(|p| p.english_name.eq_ignore_ascii_case(english_name.trim()))
}

/// Resolve either the display name or the English alias.
pub fn lookup(key: &str) -> Option<Place> {
    find_by_name(key.trim()).or_else(|| find_by_english_name(key))
}

/// Startup selection: Taipei, falling back to the first catalog entry.
pub fn default_place() -> Place {
    find_by_english_name("Taipei").unwrap_or(PLACES[0])
}

/// Places whose display name or English alias contains `term`, ignoring case.
///
/// An empty term matches everything.
pub fn search(term: &str) -> Vec<Place> {
    let needle = term.trim().to_lowercase();
    PLACES
        .iter()
        .copied()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.english_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Catalog grouped by region, in display order.
pub fn by_region() -> Vec<(Region, Vec<Place>)> {
    Region::ALL
        .iter()
        .map(|region| {
            let places = PLACES
                .iter()
                .copied()
                .filter(|p| p.region == *region)
                .collect();
            (*region, places)
        })
        .collect()
}
