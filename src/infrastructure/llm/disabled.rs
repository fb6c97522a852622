use async_trait::async_trait;

use crate::domain::ports::TextGenerator;
use crate::domain::ChatError;

/// Generator used when no API key is configured. Every call fails.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, ChatError> {
        Err(ChatError::NotConfigured)
    }
}
