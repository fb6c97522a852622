//! Parking locations and the spot grid

pub mod model;

pub use model::{Location, SpotId, SpotLayout};
