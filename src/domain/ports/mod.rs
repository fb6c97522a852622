//! Domain ports
//!
//! Trait contracts that infrastructure adapters implement.

pub mod outbound;

pub use outbound::{LocationCatalog, RandomSource, TextGenerator};
