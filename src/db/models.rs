// Data models: Rust structs that map to link store rows.
//
// Kept apart from the queries so the enricher can use them without
// depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// Which source table a link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Restaurant,
    Hotel,
    Cafe,
}

impl PlaceKind {
    pub const ALL: [PlaceKind; 3] = [PlaceKind::Restaurant, PlaceKind::Hotel, PlaceKind::Cafe];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceKind::Restaurant => "restaurant",
            PlaceKind::Hotel => "hotel",
            PlaceKind::Cafe => "cafe",
        }
    }
}

impl std::fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(PlaceKind::Restaurant),
            "hotel" => Ok(PlaceKind::Hotel),
            "cafe" => Ok(PlaceKind::Cafe),
            other => Err(format!(
                "unknown place kind '{other}' (expected restaurant, hotel or cafe)"
            )),
        }
    }
}

/// A canonical detail-page link for one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceLink {
    pub kind: PlaceKind,
    pub title: String,
    pub link: String,
}
