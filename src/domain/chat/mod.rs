//! Chatbot conversation types and prompt rendering

pub mod model;

pub use model::*;
