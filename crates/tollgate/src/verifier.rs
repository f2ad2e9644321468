//! Remote token verification.

use std::time::Duration;

use tollgate_common::constants::{DEFAULT_VERIFY_HOST, SITEVERIFY_PATH, VERIFY_TIMEOUT_SECS};
use tollgate_common::{ConfigError, VerificationRequest, VerificationResult, VerifyError};

/// Client for the siteverify endpoint.
///
/// Sends `POST {host}/recaptcha/api/siteverify` with a form-encoded
/// `secret` and `response` and parses the JSON verdict. Failures are
/// terminal for the attempt: nothing here retries.
#[derive(Clone, Debug)]
pub struct VerificationClient {
    /// HTTP client (reusable connection pool)
    http: reqwest::Client,
    /// Full siteverify URL
    endpoint: String,
}

impl VerificationClient {
    /// Client for `host` with the standard 5 second timeout
    pub fn new(host: &str) -> Result<Self, ConfigError> {
        Self::with_timeout(host, Duration::from_secs(VERIFY_TIMEOUT_SECS))
    }

    /// Client for `host` with a custom request timeout
    pub fn with_timeout(host: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let host = host.trim_end_matches('/');
        if !(host.starts_with("https://") || host.starts_with("http://")) {
            return Err(ConfigError::InvalidHost(host.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", host, SITEVERIFY_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Exchange `secret` and `token` for a verdict
    pub async fn verify(&self, secret: &str, token: &str) -> Result<VerificationResult, VerifyError> {
        self.send(&VerificationRequest::new(secret, token)).await
    }

    /// Send a prepared request
    pub async fn send(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, VerifyError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        tracing::debug!(verdict = %body, "Received response from verification server");

        VerificationResult::from_json(&body)
    }
}

impl Default for VerificationClient {
    fn default() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            endpoint: format!("{}{}", DEFAULT_VERIFY_HOST, SITEVERIFY_PATH),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> VerifyError {
    if e.is_timeout() {
        VerifyError::Timeout(e.to_string())
    } else {
        VerifyError::Transport(e.to_string())
    }
}
