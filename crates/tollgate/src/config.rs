//! Configuration management for Tollgate.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use tollgate_common::ConfigError;
use tollgate_common::constants::{DEFAULT_ACTION, DEFAULT_LISTEN_ADDR, DEFAULT_VERIFY_HOST};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Per-request timeout of the HTTP front end, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// reCAPTCHA configuration
    #[serde(default)]
    pub recaptcha: RecaptchaSettings,
}

/// Process-wide reCAPTCHA settings.
///
/// Loaded once at startup and shared read-only between requests. Fields
/// take these values unless given explicit overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaSettings {
    /// Secret key used for server-side verification
    #[serde(default)]
    pub private_key: Option<String>,

    /// Site key embedded in rendered markup
    #[serde(default)]
    pub public_key: Option<String>,

    /// Default minimum score; unset accepts any successful verification
    #[serde(default)]
    pub score_threshold: Option<f64>,

    /// Action name used by rendered markup
    #[serde(default = "default_action")]
    pub default_action: String,

    /// Host serving the siteverify endpoint
    #[serde(default = "default_verify_host")]
    pub verify_host: String,

    /// Host serving the client script, for proxied deployments
    #[serde(default)]
    pub frontend_proxy_host: Option<String>,

    /// Language hint for the client widget (`hl`)
    #[serde(default)]
    pub language: Option<String>,

    /// Skip remote verification and accept a fixed verdict
    #[serde(default)]
    pub disabled: bool,
}

impl Default for RecaptchaSettings {
    fn default() -> Self {
        Self {
            private_key: None,
            public_key: None,
            score_threshold: None,
            default_action: default_action(),
            verify_host: default_verify_host(),
            frontend_proxy_host: None,
            language: None,
            disabled: false,
        }
    }
}

impl RecaptchaSettings {
    /// Check values that would otherwise only fail on first use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.score_threshold {
            check_threshold(threshold)?;
        }
        if !self.disabled && self.private_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingSecret);
        }
        Ok(())
    }
}

/// Reject thresholds outside [0, 1] (including NaN)
pub fn check_threshold(threshold: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen_addr: Option<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub score_threshold: Option<f64>,
    pub verify_host: Option<String>,
    pub disabled: bool,
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_request_timeout() -> u64 { 10 }
fn default_action() -> String { DEFAULT_ACTION.to_string() }
fn default_verify_host() -> String { DEFAULT_VERIFY_HOST.to_string() }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        config.apply(overrides);

        config
            .recaptcha
            .validate()
            .context("Invalid reCaptcha configuration")?;

        Ok(config)
    }

    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref listen) = overrides.listen_addr {
            self.listen_addr = listen.clone();
        }
        if let Some(ref key) = overrides.private_key {
            self.recaptcha.private_key = Some(key.clone());
        }
        if let Some(ref key) = overrides.public_key {
            self.recaptcha.public_key = Some(key.clone());
        }
        if let Some(threshold) = overrides.score_threshold {
            self.recaptcha.score_threshold = Some(threshold);
        }
        if let Some(ref host) = overrides.verify_host {
            self.recaptcha.verify_host = host.clone();
        }
        if overrides.disabled {
            self.recaptcha.disabled = true;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            request_timeout_secs: default_request_timeout(),
            recaptcha: RecaptchaSettings::default(),
        }
    }
}
