//! Booking workflow controller
//!
//! Resolves catalog data, locks the addressed session, applies one
//! transition and returns a snapshot. The simulated payment delay runs with
//! the session unlocked and can be interrupted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::session::{SessionHandle, SharedSessionRegistry};
use crate::domain::booking::PaymentTicket;
use crate::domain::ports::LocationCatalog;
use crate::domain::{
    BookingDetails, BookingForm, BookingPhase, BookingSession, ConfirmationView, DomainError,
    DomainResult, Location, PaymentView, QrPayload, RefundNotice, SpotId,
};

/// Point-in-time copy of a session, safe to hand out after the lock is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: BookingPhase,
    pub details: BookingDetails,
    pub qr_payload: Option<QrPayload>,
    pub created_at: DateTime<Utc>,
}

impl From<&BookingSession> for SessionSnapshot {
    fn from(session: &BookingSession) -> Self {
        Self {
            id: session.id(),
            phase: session.phase().clone(),
            details: session.details().clone(),
            qr_payload: session.qr_payload().cloned(),
            created_at: session.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotState {
    pub spot: SpotId,
    pub occupied: bool,
}

/// Spot grid of one location, row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotBoard {
    pub location: Location,
    pub rows: Vec<Vec<SpotState>>,
}

pub struct BookingWorkflow {
    sessions: SharedSessionRegistry,
    catalog: Arc<dyn LocationCatalog>,
    payment_delay: Duration,
}

impl BookingWorkflow {
    pub fn new(
        sessions: SharedSessionRegistry,
        catalog: Arc<dyn LocationCatalog>,
        payment_delay: Duration,
    ) -> Self {
        Self {
            sessions,
            catalog,
            payment_delay,
        }
    }

    pub fn sessions(&self) -> &SharedSessionRegistry {
        &self.sessions
    }

    // ── Catalog ────────────────────────────────────────────────

    pub fn list_locations(&self) -> Vec<Location> {
        self.catalog.list()
    }

    pub fn location(&self, location_id: &str) -> DomainResult<Location> {
        self.catalog
            .find(location_id)
            .ok_or_else(|| DomainError::not_found("Location", location_id))
    }

    pub fn spot_board(&self, location_id: &str) -> DomainResult<SpotBoard> {
        let location = self.location(location_id)?;
        let occupied = self.catalog.occupied_spots(location_id);
        let rows = self
            .catalog
            .layout(location_id)
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|spot| SpotState {
                        spot: spot.clone(),
                        occupied: occupied.contains(spot),
                    })
                    .collect()
            })
            .collect();
        Ok(SpotBoard { location, rows })
    }

    // ── Session lifecycle ──────────────────────────────────────

    pub async fn open_session(&self) -> SessionSnapshot {
        let handle = self.sessions.create();
        let session = handle.lock().await;
        SessionSnapshot::from(&*session)
    }

    pub async fn snapshot(&self, session_id: Uuid) -> DomainResult<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        Ok(SessionSnapshot::from(&*session))
    }

    pub fn close_session(&self, session_id: Uuid) -> DomainResult<()> {
        self.sessions.remove(session_id)
    }

    // ── Transitions ────────────────────────────────────────────

    pub async fn select_location(
        &self,
        session_id: Uuid,
        location_id: &str,
    ) -> DomainResult<SessionSnapshot> {
        let location = self.location(location_id)?;
        let handle = self.sessions.get(session_id)?;
        let mut session = handle.lock().await;

        let toggle = session.select_location(location)?;
        handle.abort_pending();
        info!(
            session_id = %session_id,
            location_id,
            toggle = ?toggle,
            "Location selection changed"
        );
        Ok(SessionSnapshot::from(&*session))
    }

    pub async fn select_spot(
        &self,
        session_id: Uuid,
        spot_label: &str,
    ) -> DomainResult<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;
        let mut session = handle.lock().await;

        let Some(location_id) = session.location_id().map(str::to_owned) else {
            return Err(DomainError::validation(
                "Please select a parking location first.",
            ));
        };
        let spot = SpotId::parse(spot_label)
            .filter(|spot| self.catalog.layout(&location_id).contains(spot))
            .ok_or_else(|| DomainError::validation(format!("Unknown parking spot '{}'.", spot_label)))?;
        let occupied = self.catalog.occupied_spots(&location_id);

        match session.select_spot(spot.clone(), &occupied) {
            Ok(toggle) => {
                handle.abort_pending();
                info!(
                    session_id = %session_id,
                    location_id = location_id.as_str(),
                    spot = %spot,
                    toggle = ?toggle,
                    "Spot selection changed"
                );
                Ok(SessionSnapshot::from(&*session))
            }
            Err(e @ DomainError::SpotOccupied { .. }) => {
                warn!(session_id = %session_id, spot = %spot, "Occupied spot rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn submit_booking(
        &self,
        session_id: Uuid,
        form: BookingForm,
    ) -> DomainResult<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;
        let mut session = handle.lock().await;

        let total_price = session.submit(form, Utc::now())?;
        handle.abort_pending();
        info!(
            session_id = %session_id,
            duration = session.details().duration,
            total_price = %total_price,
            "Booking submitted"
        );
        Ok(SessionSnapshot::from(&*session))
    }

    /// Run the simulated payment and issue the pass.
    ///
    /// Fails with [`DomainError::Aborted`] if the session is reset, cancelled,
    /// re-selected or closed before the delay elapses.
    pub async fn confirm_payment(&self, session_id: Uuid) -> DomainResult<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;

        let (ticket, aborted) = {
            let session = handle.lock().await;
            let ticket = session.begin_payment()?;
            (ticket, handle.aborted())
        };

        info!(
            session_id = %session_id,
            delay_ms = self.payment_delay.as_millis() as u64,
            "💳 Processing simulated payment"
        );

        tokio::select! {
            _ = tokio::time::sleep(self.payment_delay) => {}
            _ = aborted => {
                warn!(session_id = %session_id, "Payment interrupted");
                return Err(DomainError::Aborted(
                    "Payment was interrupted because the booking changed.".to_string(),
                ));
            }
        }

        Self::finish_payment(&handle, ticket).await
    }

    async fn finish_payment(
        handle: &SessionHandle,
        ticket: PaymentTicket,
    ) -> DomainResult<SessionSnapshot> {
        let mut session = handle.lock().await;
        let booking_id = session.complete_payment(ticket, Utc::now())?.booking_id.clone();

        metrics::counter!("bookings_confirmed_total").increment(1);
        info!(
            session_id = %handle.id(),
            booking_id = booking_id.as_str(),
            "✅ Booking confirmed"
        );
        Ok(SessionSnapshot::from(&*session))
    }

    pub async fn cancel_booking(&self, session_id: Uuid) -> DomainResult<RefundNotice> {
        let handle = self.sessions.get(session_id)?;
        let mut session = handle.lock().await;

        let notice = session.cancel()?;
        handle.abort_pending();
        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(
            session_id = %session_id,
            spot = notice.spot.as_str(),
            amount = %notice.amount,
            "Booking cancelled"
        );
        Ok(notice)
    }

    pub async fn reset_booking(&self, session_id: Uuid) -> DomainResult<SessionSnapshot> {
        let handle = self.sessions.get(session_id)?;
        let mut session = handle.lock().await;

        session.reset();
        handle.abort_pending();
        info!(session_id = %session_id, "Booking reset");
        Ok(SessionSnapshot::from(&*session))
    }

    // ── Views ──────────────────────────────────────────────────

    pub async fn payment_view(&self, session_id: Uuid) -> DomainResult<PaymentView> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        Ok(session.payment_view())
    }

    pub async fn confirmation_view(&self, session_id: Uuid) -> DomainResult<ConfirmationView> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        Ok(session.confirmation_view())
    }
}

// ── Tests ──────────────────────────────────────────────────────
