//! Error types for the colfs harness
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Policy mismatches are deliberately NOT errors: a flag that reads back
//! wrong is recorded in the scenario report so that teardown still runs.
//! Only faults that make further collective calls unsafe surface here.

use std::io;
use thiserror::Error;

/// Result type alias for colfs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the colfs harness
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Process-group runtime fault (split/free/barrier primitive failure).
    /// Always fatal: subsequent collective calls would hang.
    #[error("group runtime fault: {0}")]
    Runtime(String),

    /// Storage engine fault (create/open/close/query failure).
    /// Treated as a fatal assertion: these succeed under correct engine behavior.
    #[error("engine fault during {op}: {detail}")]
    Engine {
        /// Engine operation that failed
        op: &'static str,
        /// Human-readable failure detail
        detail: String,
    },

    /// Container header validation failure
    #[error("container corruption: {0}")]
    Corruption(String),

    /// Invalid operation or state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Create a group runtime fault
    pub fn runtime(detail: impl Into<String>) -> Self {
        Error::Runtime(detail.into())
    }

    /// Create an engine fault for the given operation
    pub fn engine(op: &'static str, detail: impl Into<String>) -> Self {
        Error::Engine {
            op,
            detail: detail.into(),
        }
    }

    /// Create a corruption error
    pub fn corruption(detail: impl Into<String>) -> Self {
        Error::Corruption(detail.into())
    }
}
