//! Errors raised by core types outside of field validation.
//!
//! Field problems are reported as `ValidationErrors` from the `validation`
//! module instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller's identity is missing or unreadable.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
}
