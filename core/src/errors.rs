//! Unified error types for the relay core crate.
//!
//! Share and upload failures are caught at the lowest layer and collapsed
//! to empty/absent/false signals by [`ShareSession`](crate::share::ShareSession)
//! and the pipeline; these types carry the detail that ends up in logs and
//! in the result-typed variants kept for callers that need it.

use thiserror::Error;

use crate::share::Dialect;

/// Top-level error type encompassing all core error categories.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A share session or file-operation error.
    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    /// An upload-endpoint error.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// A configuration error (invalid values, missing fields).
    #[error("Config error: {0}")]
    Config(String),

    /// A low-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the share session lifecycle and file operations.
#[derive(Error, Debug)]
pub enum ShareError {
    /// An operation was attempted while the session is disconnected.
    /// No implicit reconnection is attempted.
    #[error("Not connected to share")]
    NotConnected,

    /// Protocol negotiation with the server failed.
    #[error("Negotiation failed: {0}")]
    Negotiation(String),

    /// Authentication was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The share could not be mounted.
    #[error("Mount failed: {0}")]
    Mount(String),

    /// The server negotiated a dialect outside the supported set.
    /// A downgrade is a hard failure, not a warning.
    #[error("Negotiated dialect {0} is not in the supported set")]
    DialectRejected(Dialect),

    /// The requested file or directory was not found.
    #[error("File not found: {0}")]
    NotFound(String),

    /// A file operation failed (protocol error, server failure, etc.).
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// A low-level I/O error during share operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the single timed upload attempt.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The endpoint answered with a non-2xx status.
    #[error("Upload rejected with status {0}")]
    Status(u16),

    /// Transport failure, including timeout. Not distinguished further:
    /// every non-success is an upload failure.
    #[error("Transport error: {0}")]
    Transport(String),
}
