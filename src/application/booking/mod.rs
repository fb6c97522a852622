//! Booking workflow

pub mod workflow;

pub use workflow::{BookingWorkflow, SessionSnapshot, SpotBoard, SpotState};
