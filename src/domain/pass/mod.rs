//! QR parking pass issuance

pub mod model;

pub use model::{download_file_name, QrPayload};
