//! Outbound ports: what the workflow needs from the outside world
//!
//! Each trait has a single production adapter under `infrastructure`. Tests
//! swap in scripted doubles.

use async_trait::async_trait;

use crate::domain::error::ChatError;
use crate::domain::location::{Location, SpotId, SpotLayout};

// ── LocationCatalog ────────────────────────────────────────────

/// Read-only source of parking locations and their spot layout.
pub trait LocationCatalog: Send + Sync {
    /// All locations, in display order.
    fn list(&self) -> Vec<Location>;

    fn find(&self, id: &str) -> Option<Location>;

    /// Spot grid for a location. Every location shares one layout today.
    fn layout(&self, location_id: &str) -> SpotLayout;

    /// Spots that are already taken and cannot be selected.
    fn occupied_spots(&self, location_id: &str) -> Vec<SpotId>;
}

// ── TextGenerator ──────────────────────────────────────────────

/// Hosted text-generation model used by the help chatbot.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for a fully rendered prompt.
    ///
    /// `Ok(None)` means the model answered but produced no text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, ChatError>;
}

// ── RandomSource ───────────────────────────────────────────────

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}
