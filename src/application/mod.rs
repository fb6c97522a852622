pub mod booking;
pub mod chat;
pub mod feedback;
pub mod scan;
pub mod session;

// Re-export key types for convenience
pub use booking::{BookingWorkflow, SessionSnapshot, SpotBoard, SpotState};
pub use chat::ChatbotService;
pub use feedback::FeedbackService;
pub use scan::ScanSimulator;
pub use session::{start_session_eviction_task, SessionRegistry, SharedSessionRegistry};
