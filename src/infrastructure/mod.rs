//! Infrastructure layer - external concerns

pub mod catalog;
pub mod llm;
pub mod random;

pub use catalog::InMemoryCatalog;
pub use llm::{DisabledGenerator, GeminiGenerator};
pub use random::SeededRandom;
