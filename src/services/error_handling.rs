use thiserror::Error;
use tracing::{error, info, warn};

/// Everything that can go wrong between a user action and the DOM patch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorefrontError {
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Request declined by server: {}", message.as_deref().unwrap_or("no message"))]
    Declined { message: Option<String> },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Required element missing: {0}")]
    MissingElement(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorefrontError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Structured logging helpers
pub struct LogHelper;

impl LogHelper {
    pub fn log_request_outcome(operation: &str, target: &str, result: Result<(), &StorefrontError>) {
        match result {
            Ok(()) => info!(
                operation = %operation,
                target = %target,
                "Request acknowledged"
            ),
            Err(StorefrontError::Declined { message }) => warn!(
                operation = %operation,
                target = %target,
                message = ?message,
                "Request declined"
            ),
            Err(err) => error!(
                operation = %operation,
                target = %target,
                error = %err,
                "Request failed"
            ),
        }
    }

    pub fn log_validation_failure(field: &str, value: &str, reason: &str) {
        warn!(
            field = %field,
            value = %value,
            reason = %reason,
            "Validation failed"
        );
    }
}

/// Picks the text a user sees for a failed action.
pub struct UserErrorFormatter;

impl UserErrorFormatter {
    /// Server-declined requests show the server's message when it sent one;
    /// every other failure shows `fallback`.
    pub fn message_for(error: &StorefrontError, fallback: &str) -> String {
        match error {
            StorefrontError::Declined {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declined_message_wins_over_fallback() {
        let err = StorefrontError::Declined {
            message: Some("locked".into()),
        };
        assert_eq!(UserErrorFormatter::message_for(&err, "Error clearing cart"), "locked");
    }

    #[test]
    fn test_fallback_for_everything_else() {
        let fallback = "Error updating cart";
        let cases = [
            StorefrontError::Declined { message: None },
            StorefrontError::Declined {
                message: Some("   ".into()),
            },
            StorefrontError::Transport("connection reset".into()),
            StorefrontError::Decode("expected value at line 1".into()),
        ];
        for err in cases {
            assert_eq!(UserErrorFormatter::message_for(&err, fallback), fallback);
        }
    }
}
