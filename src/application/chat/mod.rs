pub mod service;

pub use service::ChatbotService;
