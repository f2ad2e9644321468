//! Score-threshold and error-code policy.
//!
//! Turns a verdict into a [`ValidationOutcome`]:
//!
//! ```text
//! success ─┬─ threshold > score ──────────────── ScoreTooLow
//!          └─ otherwise ───────────────────────── Accepted
//! failure ─┬─ missing/invalid-input-secret ────── InvalidSecret
//!          ├─ other error-codes ───────────────── Expired
//!          └─ no error-codes ──────────────────── InvalidResponse
//! ```

use tollgate_common::{ValidationError, ValidationOutcome, VerificationResult};

/// Applies the configured threshold to verdicts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolicyEvaluator {
    /// Minimum acceptable score; `None` accepts every successful verdict
    pub score_threshold: Option<f64>,
}

impl PolicyEvaluator {
    pub fn new(score_threshold: Option<f64>) -> Self {
        Self { score_threshold }
    }

    pub fn evaluate(&self, result: VerificationResult) -> ValidationOutcome {
        evaluate(result, self.score_threshold)
    }
}

/// Evaluate `result` against `score_threshold`.
///
/// A score equal to the threshold is accepted. A successful verdict with no
/// score is accepted only when no threshold is set.
pub fn evaluate(result: VerificationResult, score_threshold: Option<f64>) -> ValidationOutcome {
    if result.success {
        return match (score_threshold, result.score) {
            (Some(threshold), Some(score)) if threshold > score => {
                tracing::info!(score, threshold, "reCaptcha score below threshold");
                ValidationOutcome::Rejected(ValidationError::ScoreTooLow { score })
            }
            (Some(threshold), None) => {
                tracing::error!(
                    threshold,
                    "Successful reCaptcha verdict carried no score, is the key a v3 key?"
                );
                ValidationOutcome::Rejected(ValidationError::InvalidResponse)
            }
            _ => ValidationOutcome::Accepted(result),
        };
    }

    if result.has_secret_fault() {
        tracing::error!(
            error_codes = ?result.error_codes,
            "Invalid reCaptcha secret key detected"
        );
        return ValidationOutcome::Rejected(ValidationError::InvalidSecret);
    }

    match result.error_codes {
        Some(error_codes) => {
            tracing::debug!(?error_codes, "reCaptcha token invalid or expired");
            ValidationOutcome::Rejected(ValidationError::Expired { error_codes })
        }
        None => {
            tracing::error!("No error-codes received from reCaptcha server");
            ValidationOutcome::Rejected(ValidationError::InvalidResponse)
        }
    }
}
