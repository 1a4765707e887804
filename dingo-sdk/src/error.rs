//! Error types for the SDK
//!
//! Covers transport, coordinator and decoding failures.

use thiserror::Error;

/// Primary error type for all SDK operations
#[derive(Debug, Error)]
pub enum SdkError {
    // ========== Transport Errors ==========

    /// Connection failed
    #[error("Connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// RPC returned a non-retryable status
    #[error("{method} failed with {code:?}: {message}")]
    Rpc {
        method: String,
        code: tonic::Code,
        message: String,
    },

    /// Every attempt ended in a retryable failure
    #[error("{method} gave up after {attempts} attempts: {reason}")]
    RetriesExhausted {
        method: String,
        attempts: u32,
        reason: String,
    },

    // ========== Coordinator Errors ==========

    /// Coordinator answered with an embedded error
    #[error("{method} rejected by coordinator (errcode {errcode}): {errmsg}")]
    Remote {
        method: String,
        errcode: i32,
        errmsg: String,
    },

    // ========== Data Errors ==========

    /// Response could not be mapped to domain types
    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    /// Text is not a valid common id
    #[error("Invalid common id: {input}")]
    InvalidCommonId { input: String },

    /// Client configuration rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ========== Runtime Errors ==========

    /// Shutdown in progress
    #[error("Shutdown in progress")]
    ShutdownInProgress,

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SdkError {
    /// Returns true if a later call may succeed without changing the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::ConnectionFailed { .. } | SdkError::RetriesExhausted { .. }
        )
    }

    /// Status code of a failed RPC, if any
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            SdkError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
