//! Core types shared across Tollgate components.

use serde::{Deserialize, Serialize};

use crate::constants::{disabled, error_codes};
use crate::error::{ValidationError, VerifyError};

/// Body of a verification call, form-encoded as `secret` and `response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    /// Server-side credential
    pub secret: String,

    /// Token submitted by the client
    #[serde(rename = "response")]
    pub token: String,
}

impl VerificationRequest {
    pub fn new(secret: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token: token.into(),
        }
    }
}

/// Verdict of the verification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,

    /// Trust estimate in [0, 1], present on successful v3 verifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Action name the client executed the challenge with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Challenge load timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,

    /// Hostname of the site where the challenge was solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Failure codes, in the order reported
    #[serde(
        rename = "error-codes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_codes: Option<Vec<String>>,
}

impl VerificationResult {
    /// Parse and validate a raw response body.
    ///
    /// The body must be a JSON object with a boolean `success`; a `score`
    /// outside [0, 1] is rejected.
    pub fn from_json(body: &str) -> Result<Self, VerifyError> {
        let result: Self =
            serde_json::from_str(body).map_err(|e| VerifyError::Parse(e.to_string()))?;

        if let Some(score) = result.score {
            if !(0.0..=1.0).contains(&score) {
                return Err(VerifyError::Parse(format!("score out of range: {score}")));
            }
        }

        Ok(result)
    }

    /// Fixed passing verdict used while verification is disabled
    pub fn disabled() -> Self {
        Self {
            success: true,
            score: Some(disabled::SCORE),
            action: Some(disabled::ACTION.to_string()),
            challenge_ts: Some(disabled::CHALLENGE_TS.to_string()),
            hostname: Some(disabled::HOSTNAME.to_string()),
            error_codes: None,
        }
    }

    /// True when the service blamed the secret key
    pub fn has_secret_fault(&self) -> bool {
        self.error_codes.as_ref().is_some_and(|codes| {
            codes
                .iter()
                .any(|code| error_codes::SECRET_FAULTS.contains(&code.as_str()))
        })
    }

    /// Parsed challenge timestamp, if present and well-formed
    pub fn challenge_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let ts = self.challenge_ts.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(ts)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }
}

/// Result of validating one submitted token
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(VerificationResult),
    Rejected(ValidationError),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Rejection code, if rejected
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(err) => Some(err.code()),
        }
    }

    pub fn into_result(self) -> Result<VerificationResult, ValidationError> {
        match self {
            Self::Accepted(result) => Ok(result),
            Self::Rejected(err) => Err(err),
        }
    }
}

impl From<Result<VerificationResult, ValidationError>> for ValidationOutcome {
    fn from(value: Result<VerificationResult, ValidationError>) -> Self {
        match value {
            Ok(result) => Self::Accepted(result),
            Err(err) => Self::Rejected(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_success_verdict() {
        let body = r#"{
            "success": true,
            "score": 0.9,
            "action": "login",
            "challenge_ts": "2024-03-01T12:00:00Z",
            "hostname": "example.com"
        }"#;
        let result = VerificationResult::from_json(body).unwrap();
        assert!(result.success);
        assert_eq!(result.score, Some(0.9));
        assert_eq!(result.action.as_deref(), Some("login"));
        assert!(result.error_codes.is_none());
    }

    #[test]
    fn test_parse_error_codes_key() {
        let body = r#"{"success": false, "error-codes": ["invalid-input-secret", "timeout-or-duplicate"]}"#;
        let result = VerificationResult::from_json(body).unwrap();
        assert_eq!(
            result.error_codes,
            Some(vec![
                "invalid-input-secret".to_string(),
                "timeout-or-duplicate".to_string()
            ])
        );
        assert!(result.has_secret_fault());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let body = r#"{"success": true, "score": 0.3, "apk_package_name": "x"}"#;
        assert!(VerificationResult::from_json(body).is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed_bodies() {
        for body in [
            "",
            "<html>502 Bad Gateway</html>",
            "[]",
            r#"{"score": 0.5}"#,
            r#"{"success": "yes"}"#,
            r#"{"success": true, "score": 1.5}"#,
            r#"{"success": true, "score": -0.1}"#,
        ] {
            let err = VerificationResult::from_json(body).unwrap_err();
            assert!(matches!(err, VerifyError::Parse(_)), "body {body:?}");
        }
    }

    #[test]
    fn test_disabled_verdict() {
        let result = VerificationResult::disabled();
        assert!(result.success);
        assert_eq!(result.score, Some(0.6));
        assert_eq!(result.hostname.as_deref(), Some("localhost"));
        assert!(result.challenge_time().is_some());
    }

    #[test]
    fn test_request_wire_names() {
        let request = VerificationRequest::new("s3cret", "tok");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["secret"], "s3cret");
        assert_eq!(value["response"], "tok");
    }

    #[test]
    fn test_outcome_conversions() {
        let accepted = ValidationOutcome::Accepted(VerificationResult::disabled());
        assert!(accepted.is_accepted());
        assert_eq!(accepted.code(), None);

        let rejected: ValidationOutcome = Err(ValidationError::InvalidResponse).into();
        assert_eq!(rejected.code(), Some("invalid_response"));
        assert_eq!(
            rejected.into_result().unwrap_err(),
            ValidationError::InvalidResponse
        );
    }

    proptest! {
        /// A score parses iff it lies within [0, 1].
        #[test]
        fn score_accepted_iff_in_range(hundredths in -200i32..=300) {
            let score = f64::from(hundredths) / 100.0;
            let body = format!(r#"{{"success": true, "score": {score}}}"#);
            let parsed = VerificationResult::from_json(&body);
            prop_assert_eq!(parsed.is_ok(), (0..=100).contains(&hundredths));
            if let Ok(result) = parsed {
                prop_assert_eq!(result.score, Some(score));
            }
        }

        /// Serializing a verdict and parsing it back yields the same verdict.
        #[test]
        fn verdict_survives_serialization(
            success in any::<bool>(),
            score in proptest::option::of((0u32..=100).prop_map(|n| f64::from(n) / 100.0)),
            action in proptest::option::of("[a-z_/]{1,16}"),
            hostname in proptest::option::of("[a-z]{1,10}\\.com"),
            error_codes in proptest::option::of(proptest::collection::vec("[a-z]{1,8}-[a-z]{1,8}", 0..3)),
        ) {
            let result = VerificationResult {
                success,
                score,
                action,
                challenge_ts: None,
                hostname,
                error_codes,
            };
            let body = serde_json::to_string(&result).unwrap();
            prop_assert_eq!(VerificationResult::from_json(&body).unwrap(), result);
        }
    }
}
