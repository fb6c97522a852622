//! Booking session lifecycle

pub mod eviction;
pub mod registry;

pub use eviction::start_session_eviction_task;
pub use registry::{SessionHandle, SessionRegistry, SharedSessionRegistry};
