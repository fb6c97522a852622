//! Booking session state machine

pub mod model;
pub mod session;

pub use model::{
    BookingDetails, BookingForm, BookingPhase, RefundNotice, Selection, SelectionKey, Toggle,
};
pub use session::{BookingSession, ConfirmationView, PaymentTicket, PaymentView};
