//! Booking session: one user's booking record plus its lifecycle phase.
//!
//! The session is a plain state machine. It never sleeps and never talks to
//! the outside world; the workflow controller resolves catalog data and runs
//! the simulated delays around it.
//!
//! ```text
//! Idle → LocationChosen → SpotChosen → Submitted → Confirmed → Cancelled
//!   ↑__________________________ reset ____________________________|
//! ```
//!
//! Every successful mutation advances the session `epoch`. A payment that was
//! started under an older epoch can no longer complete.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::location::{Location, SpotId};
use crate::domain::pass::{download_file_name, QrPayload};

use super::model::{BookingDetails, BookingForm, BookingPhase, RefundNotice, Toggle};

const CONFIRMED_LOCK_MESSAGE: &str =
    "Booking is already confirmed. Cancel it or start a new booking first.";

/// Proof that a payment was started against a particular session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTicket {
    epoch: u64,
}

/// Payment screen contents.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentView {
    Ready {
        location: Location,
        spot: SpotId,
        details: BookingDetails,
    },
    Redirect {
        reason: String,
    },
}

/// Confirmation screen contents.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationView {
    Confirmed {
        details: BookingDetails,
        payload: QrPayload,
        download_file_name: String,
    },
    Cancelled {
        notice: RefundNotice,
    },
    Redirect {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingSession {
    id: Uuid,
    details: BookingDetails,
    phase: BookingPhase,
    qr_payload: Option<QrPayload>,
    epoch: u64,
    created_at: DateTime<Utc>,
}

impl BookingSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            details: BookingDetails::default(),
            phase: BookingPhase::Idle,
            qr_payload: None,
            epoch: 0,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn details(&self) -> &BookingDetails {
        &self.details
    }

    pub fn phase(&self) -> &BookingPhase {
        &self.phase
    }

    pub fn qr_payload(&self) -> Option<&QrPayload> {
        self.qr_payload.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Currently selected location id, if any.
    pub fn location_id(&self) -> Option<&str> {
        self.details.location.as_option().map(|l| l.id.as_str())
    }

    // ── Transitions ────────────────────────────────────────────

    /// Toggle the location selection. Any change clears the spot and price.
    pub fn select_location(&mut self, location: Location) -> DomainResult<Toggle> {
        self.ensure_not_confirmed()?;

        if matches!(self.phase, BookingPhase::Cancelled(_)) {
            self.details = BookingDetails::default();
        }

        let toggle = self.details.location.toggle(location);
        self.details.selected_spot.clear();
        self.details.total_price = Decimal::ZERO;
        self.details.booking_time = None;
        self.phase = match toggle {
            Toggle::Deselected => BookingPhase::Idle,
            Toggle::Selected | Toggle::Replaced => BookingPhase::LocationChosen,
        };
        self.advance_epoch();
        Ok(toggle)
    }

    /// Toggle the spot selection for the current location.
    ///
    /// `occupied` is the pre-booked set of the current location; picking one
    /// of those is rejected without touching the session.
    pub fn select_spot(&mut self, spot: SpotId, occupied: &[SpotId]) -> DomainResult<Toggle> {
        self.ensure_not_confirmed()?;

        let Some(location) = self.details.location.as_option() else {
            return Err(DomainError::validation("Please select a parking location first."));
        };

        if occupied.contains(&spot) {
            return Err(DomainError::SpotOccupied {
                spot: spot.to_string(),
                location: location.name.clone(),
            });
        }

        let toggle = self.details.selected_spot.toggle(spot);
        // A changed spot invalidates any pending submission.
        self.details.total_price = Decimal::ZERO;
        self.details.booking_time = None;
        self.phase = match toggle {
            Toggle::Deselected => BookingPhase::LocationChosen,
            Toggle::Selected | Toggle::Replaced => BookingPhase::SpotChosen,
        };
        self.advance_epoch();
        Ok(toggle)
    }

    /// Validate the form, price the booking and move to payment.
    pub fn submit(&mut self, form: BookingForm, now: DateTime<Utc>) -> DomainResult<Decimal> {
        self.ensure_not_confirmed()?;

        let Some(location) = self.details.location.as_option() else {
            return Err(DomainError::validation("Please select a parking location first."));
        };
        if !self.details.selected_spot.is_selected() {
            return Err(DomainError::validation("Please select a parking spot first."));
        }
        form.validate()
            .map_err(|e| DomainError::from_validation_errors(&e))?;

        let total_price = location.price_for(form.duration);
        self.details.duration = form.duration;
        self.details.vehicle_plate = form.vehicle_plate;
        self.details.total_price = total_price;
        self.details.booking_time = Some(now);
        self.phase = BookingPhase::Submitted;
        self.advance_epoch();
        Ok(total_price)
    }

    /// Check that a booking is awaiting payment and remember the current epoch.
    pub fn begin_payment(&self) -> DomainResult<PaymentTicket> {
        match self.phase {
            BookingPhase::Submitted => Ok(PaymentTicket { epoch: self.epoch }),
            BookingPhase::Confirmed => Err(DomainError::Conflict(
                "Payment has already been confirmed for this booking.".to_string(),
            )),
            _ => Err(DomainError::validation(
                "Booking details not found or incomplete. Please start over.",
            )),
        }
    }

    /// Finish a payment started with `ticket` and issue the QR payload.
    pub fn complete_payment(
        &mut self,
        ticket: PaymentTicket,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<&QrPayload> {
        if self.phase == BookingPhase::Confirmed {
            return Err(DomainError::Conflict(
                "Payment has already been confirmed for this booking.".to_string(),
            ));
        }
        if ticket.epoch != self.epoch || self.phase != BookingPhase::Submitted {
            return Err(DomainError::Aborted(
                "Booking changed while the payment was processing.".to_string(),
            ));
        }

        let payload = QrPayload::issue(&self.details, issued_at)?;
        self.phase = BookingPhase::Confirmed;
        self.advance_epoch();
        let payload: &QrPayload = self.qr_payload.insert(payload);
        Ok(payload)
    }

    /// Cancel a confirmed booking, clearing the session.
    pub fn cancel(&mut self) -> DomainResult<RefundNotice> {
        let (location, spot) = match (
            &self.phase,
            self.details.location.as_option(),
            self.details.selected_spot.as_option(),
        ) {
            (BookingPhase::Confirmed, Some(location), Some(spot)) => (location, spot),
            _ => return Err(DomainError::validation("No booking to cancel.")),
        };

        let notice = RefundNotice::new(spot, location, self.details.total_price);
        self.details = BookingDetails::default();
        self.qr_payload = None;
        self.phase = BookingPhase::Cancelled(notice.clone());
        self.advance_epoch();
        Ok(notice)
    }

    /// Return to the initial state. Always succeeds.
    pub fn reset(&mut self) {
        self.details = BookingDetails::default();
        self.qr_payload = None;
        self.phase = BookingPhase::Idle;
        self.advance_epoch();
    }

    // ── Views ──────────────────────────────────────────────────

    pub fn payment_view(&self) -> PaymentView {
        if let (Some(location), Some(spot)) = (
            self.details.location.as_option(),
            self.details.selected_spot.as_option(),
        ) {
            PaymentView::Ready {
                location: location.clone(),
                spot: spot.clone(),
                details: self.details.clone(),
            }
        } else {
            PaymentView::Redirect {
                reason: "Session Expired: Booking details not found or incomplete. Please start over."
                    .to_string(),
            }
        }
    }

    pub fn confirmation_view(&self) -> ConfirmationView {
        if let BookingPhase::Cancelled(notice) = &self.phase {
            return ConfirmationView::Cancelled {
                notice: notice.clone(),
            };
        }

        match (
            &self.qr_payload,
            self.details.location.as_option(),
            self.details.selected_spot.as_option(),
        ) {
            (Some(payload), Some(_), Some(spot)) => ConfirmationView::Confirmed {
                details: self.details.clone(),
                payload: payload.clone(),
                download_file_name: download_file_name(&self.details.vehicle_plate, spot),
            },
            _ => ConfirmationView::Redirect {
                reason: "No active booking: Please complete a booking to view confirmation."
                    .to_string(),
            },
        }
    }

    // ── Helpers ────────────────────────────────────────────────

    fn ensure_not_confirmed(&self) -> DomainResult<()> {
        if self.phase == BookingPhase::Confirmed {
            Err(DomainError::Conflict(CONFIRMED_LOCK_MESSAGE.to_string()))
        } else {
            Ok(())
        }
    }

    fn advance_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::Selection;

    fn garage() -> Location {
        Location::new(
            "pw_a2",
            "Downtown Metro Garage",
            "123 Main St, City Center",
            Decimal::new(2200, 2),
            80,
        )
    }

    fn lot() -> Location {
        Location::new("pw_a1", "Airport Economy Lot", "789 Skyway Rd", Decimal::new(300, 2), 150)
    }

    fn spot(label: &str) -> SpotId {
        SpotId::parse(label).unwrap()
    }

    fn form(duration: u32, plate: &str) -> BookingForm {
        BookingForm {
            duration,
            vehicle_plate: plate.to_string(),
        }
    }

    fn submitted() -> BookingSession {
        let mut s = BookingSession::new(Uuid::new_v4());
        s.select_location(garage()).unwrap();
        s.select_spot(spot("A1"), &[]).unwrap();
        s.submit(form(3, "ABC123"), Utc::now()).unwrap();
        s
    }

    fn confirmed() -> BookingSession {
        let mut s = submitted();
        let ticket = s.begin_payment().unwrap();
        s.complete_payment(ticket, Utc::now()).unwrap();
        s
    }

    #[test]
    fn selecting_same_location_twice_returns_to_idle() {
        for loc in [garage(), lot()] {
            let mut s = BookingSession::new(Uuid::new_v4());
            s.select_location(loc.clone()).unwrap();
            s.select_spot(spot("B1"), &[]).unwrap();
            assert_eq!(s.select_location(loc).unwrap(), Toggle::Deselected);

            assert_eq!(s.details().location, Selection::Idle);
            assert_eq!(s.details().selected_spot, Selection::Idle);
            assert_eq!(s.details().total_price, Decimal::ZERO);
            assert_eq!(s.phase(), &BookingPhase::Idle);
        }
    }

    #[test]
    fn changing_location_clears_spot_and_price() {
        let mut s = submitted();
        assert_eq!(s.select_location(lot()).unwrap(), Toggle::Replaced);
        assert!(s.details().location.is("pw_a1"));
        assert!(!s.details().selected_spot.is_selected());
        assert_eq!(s.details().total_price, Decimal::ZERO);
        assert_eq!(s.phase(), &BookingPhase::LocationChosen);
    }

    #[test]
    fn spot_requires_location() {
        let mut s = BookingSession::new(Uuid::new_v4());
        let err = s.select_spot(spot("A1"), &[]).unwrap_err();
        assert_eq!(err, DomainError::validation("Please select a parking location first."));
        assert_eq!(s.phase(), &BookingPhase::Idle);
    }

    #[test]
    fn occupied_spot_is_rejected_without_change() {
        let mut s = BookingSession::new(Uuid::new_v4());
        s.select_location(garage()).unwrap();
        s.select_spot(spot("A2"), &[]).unwrap();
        let before = s.clone();

        let occupied = vec![spot("A1"), spot("B2")];
        for label in ["A1", "B2"] {
            let err = s.select_spot(spot(label), &occupied).unwrap_err();
            assert!(matches!(err, DomainError::SpotOccupied { .. }));
            assert!(s.details().selected_spot.is("A2"));
        }
        assert_eq!(s, before);
    }

    #[test]
    fn spot_toggle_deselects() {
        let mut s = BookingSession::new(Uuid::new_v4());
        s.select_location(garage()).unwrap();
        s.select_spot(spot("C3"), &[]).unwrap();
        assert_eq!(s.phase(), &BookingPhase::SpotChosen);
        assert_eq!(s.select_spot(spot("C3"), &[]).unwrap(), Toggle::Deselected);
        assert_eq!(s.phase(), &BookingPhase::LocationChosen);
    }

    #[test]
    fn submit_requires_location_and_spot() {
        let mut s = BookingSession::new(Uuid::new_v4());
        let err = s.submit(form(2, "ABC123"), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Please select a parking location first."));

        s.select_location(garage()).unwrap();
        let err = s.submit(form(2, "ABC123"), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Please select a parking spot first."));
        assert_eq!(s.phase(), &BookingPhase::LocationChosen);
    }

    #[test]
    fn submit_prices_every_valid_duration() {
        for duration in 1..=24u32 {
            for plate in ["ABC", "ABC123", "ABCDEFGHIJ"] {
                let mut s = BookingSession::new(Uuid::new_v4());
                s.select_location(garage()).unwrap();
                s.select_spot(spot("B3"), &[]).unwrap();
                let price = s.submit(form(duration, plate), Utc::now()).unwrap();
                assert_eq!(price, Decimal::from(duration) * Decimal::new(2200, 2));
                assert_eq!(s.details().total_price, price);
                assert_eq!(s.phase(), &BookingPhase::Submitted);
            }
        }
    }

    #[test]
    fn invalid_form_leaves_state_untouched() {
        let mut s = BookingSession::new(Uuid::new_v4());
        s.select_location(garage()).unwrap();
        s.select_spot(spot("A1"), &[]).unwrap();
        let before = s.clone();
        assert!(matches!(
            s.submit(form(25, "ABC123"), Utc::now()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            s.submit(form(3, "AB"), Utc::now()),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn payment_requires_submission() {
        let mut s = BookingSession::new(Uuid::new_v4());
        s.select_location(garage()).unwrap();
        s.select_spot(spot("A1"), &[]).unwrap();
        assert!(matches!(s.begin_payment(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn worked_example_issues_payload() {
        let s = confirmed();
        assert_eq!(s.details().total_price, Decimal::new(66, 0));
        assert_eq!(s.phase(), &BookingPhase::Confirmed);

        let payload = s.qr_payload().unwrap();
        assert_eq!(payload.spot, "A1");
        assert_eq!(payload.plate, "ABC123");
        let encoded = payload.encode();
        assert!(encoded.contains("\"spot\":\"A1\""));
        assert!(encoded.contains("\"plate\":\"ABC123\""));
        assert!(encoded.contains("\"paid\":\"66\""));
    }

    #[test]
    fn stale_ticket_cannot_complete() {
        let mut s = submitted();
        let ticket = s.begin_payment().unwrap();
        s.reset();
        let err = s.complete_payment(ticket, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Aborted(_)));
        assert!(s.qr_payload().is_none());
        assert_eq!(s.phase(), &BookingPhase::Idle);
    }

    #[test]
    fn second_completion_is_a_conflict() {
        let mut s = submitted();
        let first = s.begin_payment().unwrap();
        let second = s.begin_payment().unwrap();
        let booking_id = s.complete_payment(first, Utc::now()).unwrap().booking_id.clone();

        let err = s.complete_payment(second, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(s.qr_payload().unwrap().booking_id, booking_id);
    }

    #[test]
    fn changing_spot_drops_submission() {
        let mut s = submitted();
        assert_eq!(s.details().total_price, Decimal::new(66, 0));

        assert_eq!(s.select_spot(spot("B1"), &[]).unwrap(), Toggle::Replaced);
        assert_eq!(s.phase(), &BookingPhase::SpotChosen);
        assert_eq!(s.details().total_price, Decimal::ZERO);
        assert!(s.details().booking_time.is_none());
        assert!(s.begin_payment().is_err());

        assert_eq!(s.select_spot(spot("B1"), &[]).unwrap(), Toggle::Deselected);
        assert_eq!(s.phase(), &BookingPhase::LocationChosen);
        assert_eq!(s.details().total_price, Decimal::ZERO);
        assert!(s.details().selected_spot.as_option().is_none());
    }

    #[test]
    fn resubmission_invalidates_pending_ticket() {
        let mut s = submitted();
        let ticket = s.begin_payment().unwrap();
        s.submit(form(5, "XYZ999"), Utc::now()).unwrap();
        assert!(s.complete_payment(ticket, Utc::now()).is_err());
    }

    #[test]
    fn confirmed_booking_locks_selection() {
        let mut s = confirmed();
        assert!(matches!(s.select_location(lot()), Err(DomainError::Conflict(_))));
        assert!(matches!(s.select_spot(spot("B1"), &[]), Err(DomainError::Conflict(_))));
        assert!(matches!(
            s.submit(form(1, "ABC"), Utc::now()),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(s.begin_payment(), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn cancel_only_from_confirmed() {
        let mut s = submitted();
        assert_eq!(s.cancel().unwrap_err(), DomainError::validation("No booking to cancel."));

        let mut s = confirmed();
        let notice = s.cancel().unwrap();
        assert_eq!(notice.spot, "A1");
        assert_eq!(notice.amount, Decimal::new(66, 0));
        assert_eq!(s.details(), &BookingDetails::default());
        assert!(s.qr_payload().is_none());
        assert!(matches!(s.phase(), BookingPhase::Cancelled(_)));
    }

    #[test]
    fn cancelled_view_is_distinct_from_reset() {
        let mut s = confirmed();
        s.cancel().unwrap();
        assert!(matches!(s.confirmation_view(), ConfirmationView::Cancelled { .. }));

        s.reset();
        assert!(matches!(s.confirmation_view(), ConfirmationView::Redirect { .. }));
    }

    #[test]
    fn selecting_after_cancel_starts_fresh() {
        let mut s = confirmed();
        s.cancel().unwrap();
        s.select_location(lot()).unwrap();
        assert_eq!(s.phase(), &BookingPhase::LocationChosen);
        assert!(matches!(s.confirmation_view(), ConfirmationView::Redirect { .. }));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = confirmed();
        s.reset();
        let first = (s.details().clone(), s.phase().clone(), s.qr_payload().cloned());
        s.reset();
        s.reset();
        assert_eq!(first.0, BookingDetails::default());
        assert_eq!(s.details(), &first.0);
        assert_eq!(s.phase(), &BookingPhase::Idle);
        assert!(s.qr_payload().is_none());
    }

    #[test]
    fn confirmation_redirects_without_payload() {
        let s = submitted();
        assert!(matches!(s.confirmation_view(), ConfirmationView::Redirect { .. }));

        let s = BookingSession::new(Uuid::new_v4());
        assert!(matches!(s.confirmation_view(), ConfirmationView::Redirect { .. }));
    }

    #[test]
    fn confirmation_carries_download_name() {
        let s = confirmed();
        match s.confirmation_view() {
            ConfirmationView::Confirmed {
                download_file_name, ..
            } => assert_eq!(download_file_name, "ParkWatchPass-QR-ABC123-A1.png"),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn payment_view_redirects_without_spot() {
        let mut s = BookingSession::new(Uuid::new_v4());
        assert!(matches!(s.payment_view(), PaymentView::Redirect { .. }));
        s.select_location(garage()).unwrap();
        assert!(matches!(s.payment_view(), PaymentView::Redirect { .. }));
        s.select_spot(spot("A1"), &[]).unwrap();
        assert!(matches!(s.payment_view(), PaymentView::Ready { .. }));
    }

    #[test]
    fn ready_payment_view_carries_selection() {
        match submitted().payment_view() {
            PaymentView::Ready { location, spot: chosen, .. } => {
                assert_eq!(location.id, garage().id);
                assert_eq!(chosen, spot("A1"));
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }
}
