//! OCI provider implementation

use crate::cli::OciCli;
use crate::error::OciError;
use async_trait::async_trait;
use skylaunch_cloud::{
    AuthStatus, ComputeProvider, ImageInfo, InstanceInfo, LaunchSpec, LaunchedInstance,
    ShapeInfo,
};

/// Oracle Cloud Infrastructure provider
pub struct OciProvider {
    cli: OciCli,
}

impl OciProvider {
    pub fn new(cli: OciCli) -> Self {
        Self { cli }
    }

    pub fn cli(&self) -> &OciCli {
        &self.cli
    }
}

#[async_trait]
impl ComputeProvider for OciProvider {
    fn name(&self) -> &str {
        "oci"
    }

    fn display_name(&self) -> &str {
        "Oracle Cloud Infrastructure"
    }

    async fn check_auth(&self) -> skylaunch_cloud::Result<AuthStatus> {
        match self.cli.namespace().await {
            Ok(namespace) => {
                let profile = self.cli.profile().unwrap_or("DEFAULT");
                Ok(AuthStatus::ok(format!("profile {} (namespace {})", profile, namespace)))
            }
            Err(OciError::CliNotFound) => {
                Ok(AuthStatus::failed(OciError::CliNotFound.to_string()))
            }
            Err(OciError::AuthenticationFailed(msg)) => Ok(AuthStatus::failed(msg)),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_instances(
        &self,
        compartment_id: &str,
    ) -> skylaunch_cloud::Result<Vec<InstanceInfo>> {
        let instances = self.cli.list_instances(compartment_id).await?;
        tracing::debug!("Listed {} instance(s) in compartment", instances.len());
        Ok(instances.into_iter().map(InstanceInfo::from).collect())
    }

    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> skylaunch_cloud::Result<Vec<String>> {
        let domains = self.cli.list_availability_domains(compartment_id).await?;
        Ok(domains.into_iter().map(|d| d.name).collect())
    }

    async fn launch_instance(
        &self,
        spec: &LaunchSpec,
    ) -> skylaunch_cloud::Result<LaunchedInstance> {
        tracing::info!(
            availability_domain = %spec.availability_domain,
            shape = %spec.shape,
            "Launching instance {}",
            spec.display_name
        );
        let instance = self.cli.launch_instance(spec).await?;
        Ok(instance.into())
    }

    async fn list_shapes(&self, compartment_id: &str) -> skylaunch_cloud::Result<Vec<ShapeInfo>> {
        let shapes = self.cli.list_shapes(compartment_id).await?;

        // The CLI lists one entry per availability domain
        let mut unique: Vec<ShapeInfo> = Vec::new();
        for shape in shapes {
            if !unique.iter().any(|s| s.shape == shape.shape) {
                unique.push(shape.into());
            }
        }
        Ok(unique)
    }

    async fn list_images(
        &self,
        compartment_id: &str,
        shape: &str,
    ) -> skylaunch_cloud::Result<Vec<ImageInfo>> {
        let images = self.cli.list_images(compartment_id, shape).await?;
        Ok(images.into_iter().map(ImageInfo::from).collect())
    }

    async fn get_image(&self, image_id: &str) -> skylaunch_cloud::Result<ImageInfo> {
        let image = self.cli.get_image(image_id).await?;
        Ok(image.into())
    }
}
