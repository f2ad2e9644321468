//! # Tollgate
//!
//! Server-side guard for forms protected by an invisible, score-based
//! reCAPTCHA v3 challenge.
//!
//! ## Flow
//! ```text
//! browser token → ReCaptchaField → VerificationClient → siteverify
//!                        ↓
//!                 PolicyEvaluator → Accepted(verdict) | Rejected(error)
//! ```
//!
//! When verification is disabled the client is skipped and a fixed passing
//! verdict goes through the same policy.

pub mod config;
pub mod field;
pub mod policy;
pub mod render;
pub mod routes;
pub mod state;
pub mod verifier;

pub use config::{AppConfig, ConfigOverrides, RecaptchaSettings};
pub use field::{FieldOptions, HiddenInput, ReCaptchaField};
pub use policy::{PolicyEvaluator, evaluate};
pub use render::Renderer;
pub use verifier::VerificationClient;
