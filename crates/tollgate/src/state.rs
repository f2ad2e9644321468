//! Application state and shared resources.

use std::sync::Arc;

use tollgate_common::ConfigError;

use crate::config::AppConfig;
use crate::field::{FieldOptions, ReCaptchaField};
use crate::render::Renderer;

/// Shared application state.
///
/// Everything here is immutable after startup; concurrent requests only
/// read it.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Form field guarding `/submit`
    pub field: Arc<ReCaptchaField>,

    /// Challenge markup renderer
    pub renderer: Arc<Renderer>,
}

impl AppState {
    /// Build state from loaded configuration
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let field = ReCaptchaField::new(&config.recaptcha, FieldOptions::default())?;
        let renderer = Renderer::new(&config.recaptcha);

        if field.is_disabled() {
            tracing::warn!("reCaptcha verification is DISABLED, every submission will pass");
        }

        Ok(Self {
            config: Arc::new(config),
            field: Arc::new(field),
            renderer: Arc::new(renderer),
        })
    }
}
