//! OCI provider error types

use skylaunch_cloud::{CloudError, ServiceError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OciError {
    #[error(
        "oci CLI not found. Please install: https://docs.oracle.com/iaas/Content/API/SDKDocs/cliinstall.htm"
    )]
    CliNotFound,

    #[error("oci authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("oci command failed: {0}")]
    CommandFailed(String),

    #[error("oci service error: {0}")]
    Service(ServiceError),

    #[error("oci command timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<OciError> for CloudError {
    fn from(err: OciError) -> Self {
        match err {
            OciError::Service(service) => CloudError::Service(service),
            OciError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            OciError::CommandFailed(msg) => CloudError::CommandFailed(msg),
            OciError::Timeout(after) => CloudError::Timeout(OciError::Timeout(after).to_string()),
            OciError::JsonError(e) => CloudError::Json(e),
            OciError::IoError(e) => CloudError::Io(e),
            OciError::CliNotFound => CloudError::CommandFailed(OciError::CliNotFound.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OciError>;
