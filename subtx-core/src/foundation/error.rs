use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SignerUnavailable,
    SignatureRejected,
    SubmitFailed,
    SubscriptionLost,
    RpcFailed,
    QueueLockPoisoned,
    SerializationError,
    ConfigError,
    IoError,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

/// Crate-wide error type.
///
/// Every variant is `Clone` so a captured failure can live on a queue item
/// while the same value is handed to the failure callback.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("no wallet extension connected for address {address}")]
    SignerUnavailable { address: String },

    #[error("signature request rejected for address {address}")]
    SignatureRejected { address: String },

    #[error("submission failed: {details}")]
    SubmitFailed { details: String },

    #[error("chain subscription lost: {details}")]
    SubscriptionLost { details: String },

    #[error("rpc call {method} failed: {details}")]
    RpcFailed { method: String, details: String },

    #[error("queue lock poisoned during {operation}")]
    QueueLockPoisoned { operation: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;

impl QueueError {
    pub fn code(&self) -> ErrorCode {
        match self {
            QueueError::SignerUnavailable { .. } => ErrorCode::SignerUnavailable,
            QueueError::SignatureRejected { .. } => ErrorCode::SignatureRejected,
            QueueError::SubmitFailed { .. } => ErrorCode::SubmitFailed,
            QueueError::SubscriptionLost { .. } => ErrorCode::SubscriptionLost,
            QueueError::RpcFailed { .. } => ErrorCode::RpcFailed,
            QueueError::QueueLockPoisoned { .. } => ErrorCode::QueueLockPoisoned,
            QueueError::SerializationError { .. } => ErrorCode::SerializationError,
            QueueError::ConfigError(_) => ErrorCode::ConfigError,
            QueueError::IoError(_) => ErrorCode::IoError,
            QueueError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn signer_unavailable(address: impl Into<String>) -> Self {
        QueueError::SignerUnavailable { address: address.into() }
    }

    pub fn signature_rejected(address: impl Into<String>) -> Self {
        QueueError::SignatureRejected { address: address.into() }
    }

    pub fn submit_failed(details: impl Into<String>) -> Self {
        QueueError::SubmitFailed { details: details.into() }
    }

    pub fn subscription_lost(details: impl Into<String>) -> Self {
        QueueError::SubscriptionLost { details: details.into() }
    }

    pub fn rpc_failed(method: impl Into<String>, details: impl Into<String>) -> Self {
        QueueError::RpcFailed { method: method.into(), details: details.into() }
    }
}

impl From<io::Error> for QueueError {
    fn from(err: io::Error) -> Self {
        QueueError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<figment::Error> for QueueError {
    fn from(err: figment::Error) -> Self {
        QueueError::ConfigError(err.to_string())
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `QueueError` variants at the call site to preserve context.
