pub mod booking;
pub mod chat;
pub mod error;
pub mod feedback;
pub mod location;
pub mod pass;
pub mod ports;
pub mod scan;

// Re-export commonly used types
pub use booking::{
    BookingDetails, BookingForm, BookingPhase, BookingSession, ConfirmationView, PaymentView,
    RefundNotice, Selection, Toggle,
};
pub use chat::{ChatTurn, ChatbotInput, ChatbotOutput};
pub use error::{ChatError, DomainError, DomainResult};
pub use feedback::{FeedbackForm, FeedbackReceipt, FeedbackType};
pub use location::{Location, SpotId, SpotLayout};
pub use pass::QrPayload;
pub use scan::{ScanOutcome, ScanResult};
