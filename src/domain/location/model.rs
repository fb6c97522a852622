//! Parking location and spot layout entities

use std::fmt;

use rust_decimal::Decimal;

/// A parking facility with its own rate and spot inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Catalog identifier (e.g. `pw_a2`)
    pub id: String,
    pub name: String,
    pub address: String,
    /// Price per hour in RM
    pub hourly_rate: Decimal,
    /// Advertised spot count of the whole facility
    pub available_spots: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        hourly_rate: Decimal,
        available_spots: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            hourly_rate,
            available_spots,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Price of parking here for `hours` hours.
    pub fn price_for(&self, hours: u32) -> Decimal {
        Decimal::from(hours) * self.hourly_rate
    }
}

/// Grid coordinate label of a single parking space (e.g. `A1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotId(String);

impl SpotId {
    /// Normalize user input into a spot label (`" a1 "` → `A1`).
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim().to_ascii_uppercase();
        if label.is_empty() {
            None
        } else {
            Some(Self(label))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const STANDARD_GRID: [[&str; 3]; 3] = [
    ["A1", "A2", "A3"],
    ["B1", "B2", "B3"],
    ["C1", "C2", "C3"],
];

/// Fixed spot grid shared by every location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotLayout {
    rows: Vec<Vec<SpotId>>,
}

impl SpotLayout {
    /// The 3×3 grid `A1`..`C3`.
    pub fn standard() -> Self {
        let rows = STANDARD_GRID
            .iter()
            .map(|row| row.iter().map(|label| SpotId(label.to_string())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<SpotId>] {
        &self.rows
    }

    pub fn spots(&self) -> impl Iterator<Item = &SpotId> {
        self.rows.iter().flatten()
    }

    pub fn contains(&self, spot: &SpotId) -> bool {
        self.spots().any(|s| s == spot)
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SpotLayout {
    fn default() -> Self {
        Self::standard()
    }
}

// ── Tests ──────────────────────────────────────────────────────
