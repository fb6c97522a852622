//! Domain errors

use thiserror::Error;

/// Errors raised by the booking workflow and the intake services.
///
/// None of these are fatal: every variant describes a user-visible
/// rejection that leaves the session unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{entity} not found: {value}")]
    NotFound { entity: &'static str, value: String },

    #[error("{0}")]
    Validation(String),

    #[error("Spot {spot} at {location} is booked. Please select another spot.")]
    SpotOccupied { spot: String, location: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Aborted(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Flatten `validator` field errors into a single message.
    pub fn from_validation_errors(errors: &validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: {}", field, e.code))
                })
            })
            .collect();
        messages.sort();

        if messages.is_empty() {
            Self::Validation("Validation failed".to_string())
        } else {
            Self::Validation(messages.join("; "))
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures of the hosted text-generation call.
///
/// These never reach an HTTP client: the chatbot flow converts them into
/// a canned reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Text generation is not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    Decode(String),
}
