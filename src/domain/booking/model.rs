//! Booking record, selections and lifecycle phases

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::domain::location::{Location, SpotId};

/// Identity used to decide whether two selections refer to the same item.
pub trait SelectionKey {
    fn selection_key(&self) -> &str;
}

impl SelectionKey for Location {
    fn selection_key(&self) -> &str {
        &self.id
    }
}

impl SelectionKey for SpotId {
    fn selection_key(&self) -> &str {
        self.as_str()
    }
}

/// One selection dimension of a booking (location or spot).
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T> {
    Idle,
    Selected(T),
}

/// What a [`Selection::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Nothing was selected; the candidate is now selected
    Selected,
    /// A different item was selected; the candidate replaced it
    Replaced,
    /// The candidate was already selected; the selection is now idle
    Deselected,
}

impl<T> Selection<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Selected(value) => Some(value),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }

    pub fn clear(&mut self) {
        *self = Self::Idle;
    }
}

impl<T: SelectionKey> Selection<T> {
    /// Select `candidate`, or deselect it when it is already the selection.
    pub fn toggle(&mut self, candidate: T) -> Toggle {
        let outcome = match self {
            Self::Idle => Toggle::Selected,
            Self::Selected(current) if current.selection_key() == candidate.selection_key() => {
                Toggle::Deselected
            }
            Self::Selected(_) => Toggle::Replaced,
        };

        *self = match outcome {
            Toggle::Deselected => Self::Idle,
            Toggle::Selected | Toggle::Replaced => Self::Selected(candidate),
        };
        outcome
    }

    pub fn is(&self, key: &str) -> bool {
        self.as_option()
            .map(|v| v.selection_key() == key)
            .unwrap_or(false)
    }
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::Idle
    }
}

/// The in-progress or completed reservation of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub location: Selection<Location>,
    pub selected_spot: Selection<SpotId>,
    /// Hours, 1–24
    pub duration: u32,
    pub vehicle_plate: String,
    /// Always `duration × location.hourly_rate` as of the last submission
    pub total_price: Decimal,
    pub booking_time: Option<DateTime<Utc>>,
}

impl Default for BookingDetails {
    fn default() -> Self {
        Self {
            location: Selection::Idle,
            selected_spot: Selection::Idle,
            duration: 1,
            vehicle_plate: String::new(),
            total_price: Decimal::ZERO,
            booking_time: None,
        }
    }
}

/// Duration and plate entered on the booking form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct BookingForm {
    #[validate(range(min = 1, max = 24, message = "Duration must be between 1 and 24 hours"))]
    pub duration: u32,
    #[validate(length(min = 3, max = 10, message = "Vehicle plate must be 3 to 10 characters"))]
    pub vehicle_plate: String,
}

/// Refund confirmation produced by cancelling a confirmed booking.
///
/// No money moves; the notice only describes what a real gateway would do.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundNotice {
    pub spot: String,
    pub location_name: String,
    pub amount: Decimal,
    pub message: String,
}

impl RefundNotice {
    pub fn new(spot: &SpotId, location: &Location, amount: Decimal) -> Self {
        let message = format!(
            "Your booking for spot {} at {} has been cancelled. A full refund of RM{:.2} will be processed.",
            spot, location.name, amount
        );
        Self {
            spot: spot.to_string(),
            location_name: location.name.clone(),
            amount,
            message,
        }
    }
}

/// Where a session is in the booking flow.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingPhase {
    Idle,
    LocationChosen,
    SpotChosen,
    /// Booking submitted, waiting for payment
    Submitted,
    /// Paid; a QR payload has been issued
    Confirmed,
    /// Terminal display after a cancellation
    Cancelled(RefundNotice),
}

impl BookingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LocationChosen => "location_chosen",
            Self::SpotChosen => "spot_chosen",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Cancelled(_) => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ──────────────────────────────────────────────────────
