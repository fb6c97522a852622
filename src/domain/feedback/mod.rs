pub mod model;

pub use model::{FeedbackForm, FeedbackReceipt, FeedbackType};
