//! Location DTOs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::{SpotBoard, SpotState};
use crate::domain::Location;

/// Parking location with its hourly rate in RM
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub id: String,
    pub name: String,
    pub address: String,
    #[schema(value_type = String, example = "22.00")]
    pub hourly_rate: Decimal,
    pub available_spots: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Location> for LocationDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            name: l.name,
            address: l.address,
            hourly_rate: l.hourly_rate,
            available_spots: l.available_spots,
            latitude: l.latitude,
            longitude: l.longitude,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpotDto {
    pub spot: String,
    pub occupied: bool,
}

impl From<SpotState> for SpotDto {
    fn from(s: SpotState) -> Self {
        Self {
            spot: s.spot.to_string(),
            occupied: s.occupied,
        }
    }
}

/// Spot grid of a location, row by row (A..C)
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotBoardDto {
    pub location_id: String,
    pub location_name: String,
    pub rows: Vec<Vec<SpotDto>>,
}

impl From<SpotBoard> for SpotBoardDto {
    fn from(b: SpotBoard) -> Self {
        Self {
            location_id: b.location.id,
            location_name: b.location.name,
            rows: b
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}
