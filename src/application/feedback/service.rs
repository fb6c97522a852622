//! Feedback intake
//!
//! Feedback is validated and written to the log. Nothing is stored.

use tokio::time::Duration;
use tracing::info;
use validator::Validate;

use crate::domain::{DomainError, DomainResult, FeedbackForm, FeedbackReceipt};

pub struct FeedbackService {
    delay: Duration,
}

impl FeedbackService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn submit(&self, form: FeedbackForm) -> DomainResult<FeedbackReceipt> {
        form.validate()
            .map_err(|e| DomainError::from_validation_errors(&e))?;

        tokio::time::sleep(self.delay).await;

        metrics::counter!("feedback_submitted_total", "type" => form.feedback_type.as_str())
            .increment(1);
        info!(
            feedback_type = %form.feedback_type,
            name = form.name.as_deref().unwrap_or(""),
            email = form.email.as_deref().unwrap_or(""),
            message = form.message.as_str(),
            "📝 Feedback received"
        );

        Ok(FeedbackReceipt::default())
    }
}
