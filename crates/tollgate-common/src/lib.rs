//! # Tollgate Common
//!
//! Shared types, errors, and constants used across Tollgate components.
//!
//! ## Modules
//! - `types` - Verification request/verdict structures and the validation outcome
//! - `error` - Validation error taxonomy plus client and configuration errors
//! - `constants` - Wire paths, form keys, and remote error codes

pub mod constants;
pub mod error;
pub mod types;

pub use error::{ConfigError, ValidationError, VerifyError};
pub use types::*;
