//! User feedback form

use validator::{Validate, ValidateEmail, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Bug,
    Suggestion,
    General,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Suggestion => "suggestion",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct FeedbackForm {
    #[validate(length(max = 50, message = "Name is too long"))]
    pub name: Option<String>,
    #[validate(custom(function = "email_or_empty"))]
    pub email: Option<String>,
    pub feedback_type: FeedbackType,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Feedback message must be between 10 and 1000 characters."
    ))]
    pub message: String,
}

/// Acknowledgement returned after feedback has been recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReceipt {
    pub title: String,
    pub message: String,
}

impl Default for FeedbackReceipt {
    fn default() -> Self {
        Self {
            title: "Feedback Submitted!".to_string(),
            message: "Thank you for your valuable feedback.".to_string(),
        }
    }
}

fn email_or_empty(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    if email.chars().count() > 100 {
        return Err(ValidationError::new("email").with_message("Email is too long".into()));
    }
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email address".into()))
    }
}
