#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

pub const UNKNOWN_CONDITION: &str = "Unbekannt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

const COMPASS_POINTS: [CompassDirection; 8] = [
    CompassDirection::North,
    CompassDirection::NorthEast,
    CompassDirection::East,
    CompassDirection::SouthEast,
    CompassDirection::South,
    CompassDirection::SouthWest,
    CompassDirection::West,
    CompassDirection::NorthWest,
];

impl CompassDirection {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NO",
            Self::East => "O",
            Self::SouthEast => "SO",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }
}

/// Nearest of the eight compass points for a bearing in degrees.
#[must_use]
pub fn compass_direction(degrees: f32) -> CompassDirection {
    let sector = (degrees / 45.0).round() as i64;
    COMPASS_POINTS[sector.rem_euclid(8) as usize]
}

const CONDITION_LABELS: &[(u16, &str)] = &[
    (0, "Klar"),
    (1, "Überw. klar"),
    (2, "Wolkig"),
    (3, "Bedeckt"),
    (45, "Nebel"),
    (48, "Raureif"),
    (51, "Sprühregen"),
    (53, "Mäßiger Sprühregen"),
    (55, "Dichter Sprühregen"),
    (56, "Gefr. Sprühregen"),
    (57, "Dichter gefr. Sprühregen"),
    (61, "Leichtr. Regen"),
    (63, "Regen"),
    (65, "Starker Regen"),
    (66, "Gefr. Regen"),
    (67, "Starker gefr. Regen"),
    (71, "Schnee"),
    (73, "Mäßiger Schneefall"),
    (75, "Starker Schneefall"),
    (77, "Schneegriesel"),
    (80, "Schauer"),
    (81, "Mäßige Schauer"),
    (82, "Heftige Schauer"),
    (85, "Schneeschauer"),
    (86, "Starke Schneeschauer"),
    (95, "Gewitter"),
    (96, "Gewitter, leichter Hagel"),
    (99, "Gewitter, starker Hagel"),
];

/// WMO weather code to display label. Unknown codes never fail.
#[must_use]
pub fn condition_label(code: u16) -> &'static str {
    CONDITION_LABELS
        .iter()
        .find_map(|(candidate, label)| (*candidate == code).then_some(*label))
        .unwrap_or(UNKNOWN_CONDITION)
}
