//! Common error types for TB Care

use thiserror::Error;

/// Common result type for screening operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the screening engine and its callers
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model or scaler artifact missing or unloadable at startup
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Uploaded audio could not be decoded to PCM
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Classifier runtime failure on an otherwise valid batch
    #[error("Inference error: {0}")]
    Inference(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}
