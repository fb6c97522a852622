use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::domain::{FeedbackForm, FeedbackReceipt, FeedbackType};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTypeDto {
    Bug,
    Suggestion,
    General,
}

impl From<FeedbackTypeDto> for FeedbackType {
    fn from(t: FeedbackTypeDto) -> Self {
        match t {
            FeedbackTypeDto::Bug => Self::Bug,
            FeedbackTypeDto::Suggestion => Self::Suggestion,
            FeedbackTypeDto::General => Self::General,
        }
    }
}

/// Feedback form. Name and email are optional; an empty email is allowed.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub feedback_type: FeedbackTypeDto,
    #[schema(example = "The spot grid is hard to read on small screens.")]
    pub message: String,
}

impl From<FeedbackRequest> for FeedbackForm {
    fn from(r: FeedbackRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            feedback_type: r.feedback_type.into(),
            message: r.message,
        }
    }
}

impl Validate for FeedbackRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FeedbackForm::from(self.clone()).validate()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackReceiptDto {
    #[schema(example = "Feedback Submitted!")]
    pub title: String,
    #[schema(example = "Thank you for your valuable feedback.")]
    pub message: String,
}

impl From<FeedbackReceipt> for FeedbackReceiptDto {
    fn from(r: FeedbackReceipt) -> Self {
        Self {
            title: r.title,
            message: r.message,
        }
    }
}
