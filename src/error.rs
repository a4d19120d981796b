//! Error codes shared by every fatal error in the crate.
//!
//! Recoverable model-output failures never surface here; they are recorded in
//! [`crate::extract::Diagnostics`] instead.

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
