use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ScanOutcome, ScanResult};

/// Outcome of a simulated scan
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResultDto {
    /// `success` or `error`
    #[schema(example = "success")]
    pub status: String,
    /// Mock pass data read from the code, on success
    pub data: Option<String>,
    /// Reason, on failure
    pub message: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl From<ScanResult> for ScanResultDto {
    fn from(r: ScanResult) -> Self {
        let status = r.outcome.label().to_string();
        let (data, message) = match r.outcome {
            ScanOutcome::Success { data } => (Some(data), None),
            ScanOutcome::Failure { reason } => (None, Some(reason)),
        };
        Self {
            status,
            data,
            message,
            scanned_at: r.scanned_at,
        }
    }
}
