//! Simulated QR scanner
//!
//! Stands in for a gate-side camera: waits a moment, then succeeds or fails
//! at random. Issued passes are never looked up.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::info;

use crate::domain::ports::RandomSource;
use crate::domain::{ScanOutcome, ScanResult};

pub struct ScanSimulator {
    random: Arc<dyn RandomSource>,
    delay: Duration,
    success_probability: f64,
}

impl ScanSimulator {
    pub fn new(random: Arc<dyn RandomSource>, delay: Duration, success_probability: f64) -> Self {
        Self {
            random,
            delay,
            success_probability: success_probability.clamp(0.0, 1.0),
        }
    }

    pub async fn simulate_scan(&self) -> ScanResult {
        tokio::time::sleep(self.delay).await;

        let scanned_at = Utc::now();
        let outcome = if self.random.next_f64() < self.success_probability {
            ScanOutcome::simulated_success(scanned_at)
        } else {
            ScanOutcome::simulated_failure()
        };

        metrics::counter!("scans_total", "outcome" => outcome.label()).increment(1);
        info!(outcome = outcome.label(), "📷 Simulated scan finished");

        ScanResult {
            outcome,
            scanned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence of draws.
    struct Scripted(Mutex<Vec<f64>>);

    impl RandomSource for Scripted {
        fn next_f64(&self) -> f64 {
            self.0.lock().unwrap().remove(0)
        }
    }

    fn simulator(draws: Vec<f64>) -> ScanSimulator {
        ScanSimulator::new(
            Arc::new(Scripted(Mutex::new(draws))),
            Duration::from_millis(1500),
            0.7,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn draw_below_threshold_succeeds() {
        let scanner = simulator(vec![0.0, 0.69]);
        for _ in 0..2 {
            let result = scanner.simulate_scan().await;
            let ScanOutcome::Success { data } = result.outcome else {
                panic!("expected success");
            };
            assert!(data.contains("\"status\":\"VALID\""));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn draw_at_or_above_threshold_fails() {
        let scanner = simulator(vec![0.7, 0.99]);
        for _ in 0..2 {
            assert_eq!(
                scanner.simulate_scan().await.outcome,
                ScanOutcome::Failure {
                    reason: "Invalid or unreadable QR Code.".into()
                }
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_configured_delay() {
        let scanner = simulator(vec![0.1]);
        let started = tokio::time::Instant::now();
        scanner.simulate_scan().await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
