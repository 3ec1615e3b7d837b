//! Cloud provider error types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    /// Structured error reported by the provider's API
    #[error("Service error: {0}")]
    Service(ServiceError),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// The structured service error, if the provider reported one
    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            CloudError::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for CloudError {
    fn from(err: ServiceError) -> Self {
        CloudError::Service(err)
    }
}

/// Error payload returned by the provider API for a failed request
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{status} {code}: {message} (request id: {request_id})")]
pub struct ServiceError {
    /// HTTP status code
    pub status: u16,

    /// Provider error code (e.g., "InternalError", "TooManyRequests")
    pub code: String,

    /// Human readable message
    pub message: String,

    /// Correlation id for support requests
    pub request_id: String,

    /// Server supplied retry hint, when the provider exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<Duration>,
}

impl ServiceError {
    pub fn new(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            request_id: request_id.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
