//! Error types for Tollgate components.

use thiserror::Error;

use crate::constants::codes;

/// Reasons a submitted challenge token is rejected.
///
/// `Display` yields the message shown next to the form field; `code()`
/// yields the machine-readable code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The verification service could not be reached, answered with an
    /// error status, or sent an unreadable body
    #[error("Connection to reCaptcha server failed")]
    ConnectionFailed { reason: String },

    /// Verification succeeded but the score is below the threshold
    #[error("reCaptcha score is too low. score: {score}")]
    ScoreTooLow { score: f64 },

    /// The service rejected our secret key
    #[error("Connection to reCaptcha server failed")]
    InvalidSecret,

    /// The token was invalid, expired, or already used
    #[error("reCaptcha invalid or expired, try again")]
    Expired { error_codes: Vec<String> },

    /// The service reported failure without any error codes
    #[error("reCaptcha response from Google not valid, try again")]
    InvalidResponse,
}

impl ValidationError {
    /// Machine-readable code for the form layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => codes::CONNECTION_FAILED,
            Self::ScoreTooLow { .. } => codes::SCORE,
            Self::InvalidSecret => codes::INVALID_SECRET,
            Self::Expired { .. } => codes::EXPIRED,
            Self::InvalidResponse => codes::INVALID_RESPONSE,
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConnectionFailed { .. } => 503,
            Self::ScoreTooLow { .. } => 422,
            Self::InvalidSecret => 500,
            Self::Expired { .. } => 422,
            Self::InvalidResponse => 502,
        }
    }

    /// True when the fault lies outside the end user's control
    pub fn is_operator_fault(&self) -> bool {
        matches!(self, Self::InvalidSecret | Self::InvalidResponse)
    }

    /// Returns true if resubmitting the form may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Expired { .. })
    }
}

/// Failures of the remote verification exchange
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid verification response: {0}")]
    Parse(String),
}

impl From<VerifyError> for ValidationError {
    fn from(err: VerifyError) -> Self {
        Self::ConnectionFailed {
            reason: err.to_string(),
        }
    }
}

/// Configuration faults detected when building fields, clients, or markup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No private key configured and verification is enabled
    #[error("reCaptcha private key is not configured")]
    MissingSecret,

    /// No public key available for rendering
    #[error("reCaptcha public key is not configured")]
    MissingPublicKey,

    #[error("invalid public key: {0:?}")]
    InvalidPublicKey(String),

    #[error("score threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("invalid verification host: {0}")]
    InvalidHost(String),

    #[error("invalid action name: {0:?}")]
    InvalidAction(String),

    #[error("invalid callback name: {0:?}")]
    InvalidCallback(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ValidationError::ConnectionFailed {
                reason: "refused".to_string(),
            },
            ValidationError::ScoreTooLow { score: 0.1 },
            ValidationError::InvalidSecret,
            ValidationError::Expired {
                error_codes: vec!["timeout-or-duplicate".to_string()],
            },
            ValidationError::InvalidResponse,
        ];

        let mut seen: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), errors.len());
    }

    #[test]
    fn test_score_message_interpolates_score() {
        let err = ValidationError::ScoreTooLow { score: 0.5 };
        assert_eq!(err.to_string(), "reCaptcha score is too low. score: 0.5");
    }

    #[test]
    fn test_connection_failed_hides_reason_from_message() {
        let err: ValidationError = VerifyError::Status(500).into();
        assert_eq!(err.code(), "connection_failed");
        assert_eq!(err.to_string(), "Connection to reCaptcha server failed");
        match err {
            ValidationError::ConnectionFailed { reason } => assert_eq!(reason, "HTTP status 500"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_operator_faults() {
        assert!(ValidationError::InvalidSecret.is_operator_fault());
        assert!(ValidationError::InvalidResponse.is_operator_fault());
        assert!(!ValidationError::ScoreTooLow { score: 0.2 }.is_operator_fault());
        assert!(!ValidationError::InvalidSecret.is_retryable());
    }
}
