//! Text-generation adapters for the help chatbot

pub mod disabled;
pub mod gemini;

pub use disabled::DisabledGenerator;
pub use gemini::GeminiGenerator;
