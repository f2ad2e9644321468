//! reCAPTCHA form field.
//!
//! The field resolves its key and threshold once, at construction, then
//! validates one submitted token per call: remote verification (skipped when
//! disabled) followed by the score policy.

mod widget;

pub use widget::HiddenInput;

use std::collections::HashMap;

use tollgate_common::{
    ConfigError, ValidationError, ValidationOutcome, VerificationResult,
};

use crate::config::{RecaptchaSettings, check_threshold};
use crate::policy::PolicyEvaluator;
use crate::verifier::VerificationClient;

/// Explicit per-field values, taking precedence over the settings
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub private_key: Option<String>,
    pub score_threshold: Option<f64>,
    pub widget: Option<HiddenInput>,
}

/// Form field validating a submitted reCAPTCHA v3 token
#[derive(Debug, Clone)]
pub struct ReCaptchaField {
    private_key: Option<String>,
    policy: PolicyEvaluator,
    disabled: bool,
    client: VerificationClient,
    widget: HiddenInput,
}

impl ReCaptchaField {
    /// Build a field from process-wide settings and per-field overrides.
    ///
    /// Fails when no private key can be resolved while verification is
    /// enabled, or when the resolved threshold is outside [0, 1].
    pub fn new(settings: &RecaptchaSettings, options: FieldOptions) -> Result<Self, ConfigError> {
        let private_key = options
            .private_key
            .or_else(|| settings.private_key.clone())
            .filter(|key| !key.is_empty());

        if private_key.is_none() && !settings.disabled {
            return Err(ConfigError::MissingSecret);
        }

        let score_threshold = options
            .score_threshold
            .or(settings.score_threshold)
            .map(check_threshold)
            .transpose()?;

        let client = VerificationClient::new(&settings.verify_host)?;

        Ok(Self {
            private_key,
            policy: PolicyEvaluator::new(score_threshold),
            disabled: settings.disabled,
            client,
            widget: options.widget.unwrap_or_default(),
        })
    }

    /// Replace the verification client (custom timeout or endpoint)
    pub fn with_client(mut self, client: VerificationClient) -> Self {
        self.client = client;
        self
    }

    pub fn widget(&self) -> &HiddenInput {
        &self.widget
    }

    pub fn score_threshold(&self) -> Option<f64> {
        self.policy.score_threshold
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Validate the token found in submitted form data
    pub async fn clean(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<VerificationResult, ValidationError> {
        let token = self.widget.value_from_form(form);
        self.validate(token).await.into_result()
    }

    /// Validate a raw token; a missing token is sent as empty and left to
    /// the service to reject
    pub async fn validate(&self, token: Option<&str>) -> ValidationOutcome {
        let result = if self.disabled {
            tracing::debug!("reCaptcha verification disabled, using fixed verdict");
            VerificationResult::disabled()
        } else {
            let secret = self.private_key.as_deref().unwrap_or_default();
            match self.client.verify(secret, token.unwrap_or_default()).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(
                        endpoint = %self.client.endpoint(),
                        error = %e,
                        "Connection to reCaptcha server failed"
                    );
                    return ValidationOutcome::Rejected(e.into());
                }
            }
        };

        let outcome = self.policy.evaluate(result);

        if let ValidationOutcome::Accepted(ref verdict) = outcome {
            tracing::info!(
                score = ?verdict.score,
                action = ?verdict.action,
                hostname = ?verdict.hostname,
                "reCaptcha token accepted"
            );
        }

        outcome
    }
}
