pub mod chatbot;
pub mod feedback;
pub mod health;
pub mod locations;
pub mod metrics;
pub mod request_id;
pub mod scan;
pub mod sessions;
