//! Compute provider trait definition

use crate::error::Result;
use crate::model::{ImageInfo, InstanceInfo, LaunchSpec, LaunchedInstance, ShapeInfo};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Compute provider abstraction trait
///
/// The acquisition loop only needs listing and launch calls; the remaining
/// methods back the interactive setup and diagnostics commands.
///
/// `launch_instance` must report API rejections as
/// [`CloudError::Service`](crate::CloudError::Service) so that rate limiting
/// and capacity exhaustion can be told apart from transport failures.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name (e.g., "oci")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// List every instance in the compartment, including terminated ones
    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<InstanceInfo>>;

    /// List availability domain names visible to the compartment
    async fn list_availability_domains(&self, compartment_id: &str) -> Result<Vec<String>>;

    /// Issue exactly one instance creation call
    async fn launch_instance(&self, spec: &LaunchSpec) -> Result<LaunchedInstance>;

    /// List shapes available in the compartment
    async fn list_shapes(&self, compartment_id: &str) -> Result<Vec<ShapeInfo>>;

    /// List images compatible with a shape
    async fn list_images(&self, compartment_id: &str, shape: &str) -> Result<Vec<ImageInfo>>;

    /// Look up a single image
    async fn get_image(&self, image_id: &str) -> Result<ImageInfo>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/tenancy information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}
