//! Simulated scan results
//!
//! A scan never decodes an issued pass; the outcome is drawn at random to
//! demonstrate the gate-side experience.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Mock pass data "read" from the code
    Success { data: String },
    Failure { reason: String },
}

impl ScanOutcome {
    pub fn simulated_success(at: DateTime<Utc>) -> Self {
        let data = serde_json::json!({
            "bookingId": format!("PARKWATCHPASS-SIM-{}", at.timestamp_millis()),
            "location": "Simulated Lot A",
            "plate": "XYZ-789",
            "status": "VALID",
        })
        .to_string();
        Self::Success { data }
    }

    pub fn simulated_failure() -> Self {
        Self::Failure {
            reason: "Invalid or unreadable QR Code.".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub outcome: ScanOutcome,
    pub scanned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_mock_pass() {
        let at = Utc::now();
        let ScanOutcome::Success { data } = ScanOutcome::simulated_success(at) else {
            panic!("expected success");
        };
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["status"], "VALID");
        assert_eq!(value["plate"], "XYZ-789");
        assert_eq!(
            value["bookingId"],
            format!("PARKWATCHPASS-SIM-{}", at.timestamp_millis())
        );
    }

    #[test]
    fn labels() {
        assert_eq!(ScanOutcome::simulated_failure().label(), "error");
        assert!(!ScanOutcome::simulated_failure().is_success());
    }
}
