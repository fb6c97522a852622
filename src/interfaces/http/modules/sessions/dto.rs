//! Booking session DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::application::SessionSnapshot;
use crate::domain::{BookingDetails, BookingForm, Location, QrPayload, RefundNotice, SpotId};
use crate::interfaces::http::modules::locations::LocationDto;

pub const CURRENCY: &str = "RM";

/// Current state of a booking session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    /// idle, location_chosen, spot_chosen, submitted, confirmed or cancelled
    #[schema(example = "spot_chosen")]
    pub phase: String,
    pub location: Option<LocationDto>,
    #[schema(example = "A1")]
    pub selected_spot: Option<String>,
    pub duration: u32,
    pub vehicle_plate: String,
    #[schema(value_type = String, example = "66")]
    pub total_price: Decimal,
    pub booking_time: Option<DateTime<Utc>>,
    /// Encoded QR payload once the booking is paid
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionSnapshot> for SessionDto {
    fn from(s: SessionSnapshot) -> Self {
        let BookingDetails {
            location,
            selected_spot,
            duration,
            vehicle_plate,
            total_price,
            booking_time,
        } = s.details;

        Self {
            id: s.id,
            phase: s.phase.as_str().to_string(),
            location: location.as_option().cloned().map(Into::into),
            selected_spot: selected_spot.as_option().map(ToString::to_string),
            duration,
            vehicle_plate,
            total_price,
            booking_time,
            qr_code: s.qr_payload.as_ref().map(QrPayload::encode),
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectLocationRequest {
    #[validate(length(min = 1, message = "location_id is required"))]
    #[schema(example = "pw_a2")]
    pub location_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectSpotRequest {
    #[validate(length(min = 1, message = "spot_id is required"))]
    #[schema(example = "A1")]
    pub spot_id: String,
}

/// Booking form. Duration is in hours (1-24), plate 3-10 characters.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookingRequest {
    #[schema(example = 3)]
    pub duration: u32,
    #[schema(example = "ABC123")]
    pub vehicle_plate: String,
}

impl From<BookingRequest> for BookingForm {
    fn from(r: BookingRequest) -> Self {
        Self {
            duration: r.duration,
            vehicle_plate: r.vehicle_plate.trim().to_string(),
        }
    }
}

impl Validate for BookingRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        BookingForm::from(self.clone()).validate()
    }
}

/// Summary shown on the payment screen
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSummaryDto {
    pub location_name: String,
    pub location_address: String,
    pub spot: String,
    pub duration: u32,
    pub vehicle_plate: String,
    #[schema(value_type = String, example = "66")]
    pub total_price: Decimal,
    #[schema(example = "RM")]
    pub currency: String,
}

impl PaymentSummaryDto {
    pub fn new(location: Location, spot: SpotId, details: BookingDetails) -> Self {
        Self {
            location_name: location.name,
            location_address: location.address,
            spot: spot.to_string(),
            duration: details.duration,
            vehicle_plate: details.vehicle_plate,
            total_price: details.total_price,
            currency: CURRENCY.to_string(),
        }
    }
}

/// Issued parking pass
#[derive(Debug, Serialize, ToSchema)]
pub struct PassDto {
    pub booking_id: String,
    pub location_name: String,
    pub location_address: String,
    pub spot: String,
    pub vehicle_plate: String,
    pub duration: u32,
    #[schema(value_type = String, example = "66")]
    pub total_paid: Decimal,
    pub booking_time: Option<DateTime<Utc>>,
    /// Text to render as the QR image
    pub qr_code: String,
    #[schema(example = "ParkWatchPass-QR-ABC123-A1.png")]
    pub download_file_name: String,
}

impl PassDto {
    pub fn new(details: BookingDetails, payload: QrPayload, download_file_name: String) -> Self {
        let location_address = details
            .location
            .as_option()
            .map(|l| l.address.clone())
            .unwrap_or_default();
        Self {
            qr_code: payload.encode(),
            booking_id: payload.booking_id,
            location_name: payload.location,
            location_address,
            spot: payload.spot,
            vehicle_plate: payload.plate,
            duration: payload.duration,
            total_paid: payload.paid,
            booking_time: details.booking_time,
            download_file_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundDto {
    pub spot: String,
    pub location_name: String,
    #[schema(value_type = String, example = "66")]
    pub amount: Decimal,
    pub message: String,
}

impl From<RefundNotice> for RefundDto {
    fn from(n: RefundNotice) -> Self {
        Self {
            spot: n.spot,
            location_name: n.location_name,
            amount: n.amount,
            message: n.message,
        }
    }
}

/// Confirmation screen: either the issued pass or, right after a
/// cancellation, the refund notice.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmationDto {
    /// `confirmed` or `cancelled`
    pub status: String,
    pub pass: Option<PassDto>,
    pub refund: Option<RefundDto>,
}
