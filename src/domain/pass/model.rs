//! QR payload issued for a paid booking
//!
//! The payload is a compact JSON object. It is not signed: scanners treat it
//! as an opaque string and nothing downstream verifies it.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingDetails;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::location::SpotId;

/// Prefix of issued booking ids; the suffix is the issuance time in Unix millis.
pub const BOOKING_ID_PREFIX: &str = "PARKPASS-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub booking_id: String,
    /// Location name
    pub location: String,
    pub spot: String,
    pub plate: String,
    /// Hours
    pub duration: u32,
    pub paid: Decimal,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

impl QrPayload {
    /// Build the payload for a finalized booking.
    pub fn issue(details: &BookingDetails, issued_at: DateTime<Utc>) -> DomainResult<Self> {
        let location = details
            .location
            .as_option()
            .ok_or_else(|| DomainError::validation("Cannot issue a pass without a location."))?;
        let spot = details
            .selected_spot
            .as_option()
            .ok_or_else(|| DomainError::validation("Cannot issue a pass without a spot."))?;

        Ok(Self {
            booking_id: format!("{}{}", BOOKING_ID_PREFIX, issued_at.timestamp_millis()),
            location: location.name.clone(),
            spot: spot.to_string(),
            plate: details.vehicle_plate.clone(),
            duration: details.duration,
            paid: details.total_price.normalize(),
            timestamp: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Text that goes into the QR image.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "bookingId": self.booking_id,
            "location": self.location,
            "spot": self.spot,
            "plate": self.plate,
            "duration": self.duration,
            "paid": self.paid.to_string(),
            "timestamp": self.timestamp,
        })
        .to_string()
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// File name offered when the pass image is downloaded.
pub fn download_file_name(plate: &str, spot: &SpotId) -> String {
    format!("ParkWatchPass-QR-{}-{}.png", plate, spot)
}

// ── Tests ──────────────────────────────────────────────────────
