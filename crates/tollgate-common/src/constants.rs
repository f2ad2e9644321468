//! Shared constants for Tollgate components.

/// Default verification host (the public reCAPTCHA service)
pub const DEFAULT_VERIFY_HOST: &str = "https://www.google.com";

/// Path of the verification endpoint, appended to the verification host
pub const SITEVERIFY_PATH: &str = "/recaptcha/api/siteverify";

/// Path of the client-side API script, appended to the frontend host
pub const API_SCRIPT_PATH: &str = "/recaptcha/api.js";

/// Remote verification timeout in seconds
pub const VERIFY_TIMEOUT_SECS: u64 = 5;

/// Form key under which the browser submits the challenge token
pub const RESPONSE_FIELD: &str = "g-recaptcha-response";

/// CSS class carried by every hidden token input
pub const HIDDEN_INPUT_CLASS: &str = "tollgate-recaptcha-hidden-field";

/// Action name used when neither the call nor the settings provide one
pub const DEFAULT_ACTION: &str = "homepage";

/// Default Tollgate HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8888";

/// Error codes reported by the verification service in `error-codes`
pub mod error_codes {
    /// The secret parameter is missing
    pub const MISSING_INPUT_SECRET: &str = "missing-input-secret";

    /// The secret parameter is invalid or malformed
    pub const INVALID_INPUT_SECRET: &str = "invalid-input-secret";

    /// The response parameter is missing
    pub const MISSING_INPUT_RESPONSE: &str = "missing-input-response";

    /// The response parameter is invalid or malformed
    pub const INVALID_INPUT_RESPONSE: &str = "invalid-input-response";

    /// The response is no longer valid: either too old or used previously
    pub const TIMEOUT_OR_DUPLICATE: &str = "timeout-or-duplicate";

    /// Codes that point at the server credential rather than the user's token
    pub const SECRET_FAULTS: [&str; 2] = [MISSING_INPUT_SECRET, INVALID_INPUT_SECRET];
}

/// Fixed verdict used when verification is disabled
pub mod disabled {
    pub const SCORE: f64 = 0.6;
    pub const ACTION: &str = "homepage";
    pub const CHALLENGE_TS: &str = "2021-01-24T20:00:42Z";
    pub const HOSTNAME: &str = "localhost";
}

/// Machine-readable rejection codes surfaced to the form layer
pub mod codes {
    pub const CONNECTION_FAILED: &str = "connection_failed";
    pub const SCORE: &str = "score";
    pub const INVALID_SECRET: &str = "invalid_secret";
    pub const EXPIRED: &str = "expired";
    pub const INVALID_RESPONSE: &str = "invalid_response";
}
