//! Error types for the kernel library.
//!
//! Kernel preconditions (index-aligned input lengths, in-range bin ids) are
//! checked at the public API boundary and reported through [`KernelError`]
//! rather than being left as caller-enforced contracts.

use std::fmt;
use thiserror::Error;

/// Error codes for kernel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided (mismatched lengths, out-of-range bin id).
    InvalidArgument,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
        }
    }
}

/// Main error type for kernel operations.
#[derive(Error, Debug, Clone)]
pub struct KernelError {
    code: ErrorCode,
    message: String,
}

impl KernelError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
