pub mod model;

pub use model::{ScanOutcome, ScanResult};
