//! # ParkWatch Pass
//!
//! Demo parking booking service: browse locations, pick a spot on the grid,
//! pay (simulated), receive a QR parking pass, cancel for a refund notice.
//! Also hosts a simulated pass scanner, a help chatbot and a feedback form.
//!
//! ## Architecture
//!
//! - **domain**: Booking session state machine, locations, passes, forms
//! - **application**: Workflows over sessions, scanner, chatbot, feedback
//! - **infrastructure**: Location catalog, randomness, text generation client
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export API router
pub use interfaces::http::{create_api_router, ParkWatchState};
