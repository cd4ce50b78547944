//! Error handling for the stock dashboard engine.
//!
//! Carries the propagation policy in its shape: request failures keep
//! the endpoint for logs and a message fit for the user, rejected
//! transitions are silent, configuration problems are fatal at startup.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Data access errors
    #[error("Request to {endpoint} failed: {message}")]
    RequestFailed { endpoint: String, message: String },

    // State machine errors
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    // Ambient errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export failed: {0}")]
    Export(#[from] shared::table::ExportError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn request_failed(endpoint: impl Into<String>, message: impl Into<String>) -> AppError {
        AppError::RequestFailed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Text safe to show the user; endpoints and internals stay in logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::RequestFailed { message, .. } => message.clone(),
            AppError::ValidationRejected(message) => message.clone(),
            AppError::Configuration(message) => format!("Configuration error: {}", message),
            AppError::Export(err) => format!("Export failed: {}", err),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
