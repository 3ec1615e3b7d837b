//! oci CLI wrapper
//!
//! Wraps the `oci` CLI commands used by SkyLaunch. Every command is run with
//! `--all` where it pages, and responses are decoded from the `{"data": ...}`
//! envelope the CLI prints on stdout.

use crate::error::{OciError, Result};
use serde::{Deserialize, Serialize};
use skylaunch_cloud::{
    ImageInfo, InstanceInfo, LaunchSpec, LaunchedInstance, LifecycleState, ServiceError, ShapeInfo,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const OCI_BIN: &str = "oci";
/// Upper bound for a single CLI invocation
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// oci CLI wrapper
#[derive(Debug, Clone, Default)]
pub struct OciCli {
    profile: Option<String>,
    config_file: Option<PathBuf>,
}

impl OciCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named profile from the CLI config file
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Use a config file other than `~/.oci/config`
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Arguments placed before every subcommand
    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref file) = self.config_file {
            args.push("--config-file".to_string());
            args.push(file.display().to_string());
        }
        if let Some(ref profile) = self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args
    }

    /// Run an oci command and return stdout
    async fn run_command(&self, args: &[String]) -> Result<String> {
        let mut cmd = Command::new(OCI_BIN);
        cmd.args(self.global_args());
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!("Running: oci {}", args.join(" "));

        let output = match tokio::time::timeout(COMMAND_TIMEOUT, cmd.output()).await {
            Err(_) => return Err(OciError::Timeout(COMMAND_TIMEOUT)),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => return Err(OciError::CliNotFound),
            Ok(result) => result?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if let Some(service) = parse_service_error(&stderr) {
                tracing::debug!(
                    status = service.status,
                    code = %service.code,
                    request_id = %service.request_id,
                    "oci reported a service error"
                );
                return Err(OciError::Service(service));
            }
            return Err(OciError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Check that the CLI is installed and the profile can reach the tenancy
    ///
    /// Returns the Object Storage namespace, which every authenticated
    /// tenancy has.
    pub async fn namespace(&self) -> Result<String> {
        let output = match self.run_command(&args(&["os", "ns", "get"])).await {
            Ok(output) => output,
            Err(OciError::Service(service)) if service.status == 401 => {
                return Err(OciError::AuthenticationFailed(service.message));
            }
            Err(OciError::CommandFailed(msg)) => return Err(OciError::AuthenticationFailed(msg)),
            Err(e) => return Err(e),
        };
        let envelope: Envelope<String> = serde_json::from_str(&output)?;
        Ok(envelope.data)
    }

    /// List all instances in a compartment
    pub async fn list_instances(&self, compartment_id: &str) -> Result<Vec<OciInstance>> {
        let output = self
            .run_command(&args(&[
                "compute",
                "instance",
                "list",
                "--compartment-id",
                compartment_id,
                "--all",
            ]))
            .await?;
        decode_list(&output)
    }

    /// List availability domains
    pub async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<OciAvailabilityDomain>> {
        let output = self
            .run_command(&args(&[
                "iam",
                "availability-domain",
                "list",
                "--compartment-id",
                compartment_id,
            ]))
            .await?;
        decode_list(&output)
    }

    /// Launch an instance in a single availability domain
    pub async fn launch_instance(&self, spec: &LaunchSpec) -> Result<OciInstance> {
        let output = self.run_command(&launch_args(spec)).await?;
        let envelope: Envelope<OciInstance> = serde_json::from_str(&output)?;
        Ok(envelope.data)
    }

    /// List shapes usable in a compartment
    pub async fn list_shapes(&self, compartment_id: &str) -> Result<Vec<OciShape>> {
        let output = self
            .run_command(&args(&[
                "compute",
                "shape",
                "list",
                "--compartment-id",
                compartment_id,
                "--all",
            ]))
            .await?;
        decode_list(&output)
    }

    /// List images compatible with a shape
    pub async fn list_images(&self, compartment_id: &str, shape: &str) -> Result<Vec<OciImage>> {
        let output = self
            .run_command(&args(&[
                "compute",
                "image",
                "list",
                "--compartment-id",
                compartment_id,
                "--shape",
                shape,
                "--all",
            ]))
            .await?;
        decode_list(&output)
    }

    /// Get a single image
    pub async fn get_image(&self, image_id: &str) -> Result<OciImage> {
        let output = self
            .run_command(&args(&["compute", "image", "get", "--image-id", image_id]))
            .await?;
        let envelope: Envelope<OciImage> = serde_json::from_str(&output)?;
        Ok(envelope.data)
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Build the argument list for `oci compute instance launch`
fn launch_args(spec: &LaunchSpec) -> Vec<String> {
    let mut launch = args(&[
        "compute",
        "instance",
        "launch",
        "--compartment-id",
        &spec.compartment_id,
        "--availability-domain",
        &spec.availability_domain,
        "--subnet-id",
        &spec.subnet_id,
        "--image-id",
        &spec.image_id,
        "--shape",
        &spec.shape,
        "--display-name",
        &spec.display_name,
    ]);

    // Fixed shapes reject a shape config
    if spec.shape.ends_with(".Flex") {
        launch.push("--shape-config".to_string());
        launch.push(
            serde_json::json!({
                "ocpus": spec.ocpus,
                "memoryInGBs": spec.memory_in_gbs,
            })
            .to_string(),
        );
    }

    if let Some(ref key) = spec.ssh_authorized_keys {
        launch.push("--metadata".to_string());
        launch.push(serde_json::json!({ "ssh_authorized_keys": key }).to_string());
    }

    launch
}

/// Decode a listing; the CLI prints nothing at all for an empty result
fn decode_list<T: serde::de::DeserializeOwned>(output: &str) -> Result<Vec<T>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    let envelope: Envelope<Vec<T>> = serde_json::from_str(output)?;
    Ok(envelope.data)
}

/// Extract the structured error the CLI prints as `ServiceError:\n{...}`
pub fn parse_service_error(stderr: &str) -> Option<ServiceError> {
    let start = stderr.find("ServiceError:")?;
    let body = &stderr[start..];
    let open = body.find('{')?;
    let close = body.rfind('}')?;
    if close < open {
        return None;
    }

    let raw: RawServiceError = serde_json::from_str(&body[open..=close]).ok()?;
    Some(ServiceError::new(
        raw.status,
        raw.code,
        raw.message,
        raw.request_id.unwrap_or_default(),
    ))
}

#[derive(Debug, Deserialize)]
struct RawServiceError {
    status: u16,
    code: String,
    message: String,
    #[serde(rename = "opc-request-id")]
    request_id: Option<String>,
}

/// `{"data": ...}` wrapper around every CLI response
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Instance as printed by the oci CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OciInstance {
    pub id: String,
    pub display_name: String,
    pub shape: String,
    pub availability_domain: String,
    pub lifecycle_state: LifecycleState,
    pub shape_config: Option<OciShapeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OciShapeConfig {
    pub ocpus: Option<f32>,
    pub memory_in_gbs: Option<f32>,
}

impl From<OciInstance> for InstanceInfo {
    fn from(instance: OciInstance) -> Self {
        let (ocpus, memory_in_gbs) = instance
            .shape_config
            .map(|c| (c.ocpus.unwrap_or(0.0), c.memory_in_gbs.unwrap_or(0.0)))
            .unwrap_or((0.0, 0.0));
        Self {
            id: instance.id,
            display_name: instance.display_name,
            shape: instance.shape,
            ocpus,
            memory_in_gbs,
            lifecycle_state: instance.lifecycle_state,
        }
    }
}

impl From<OciInstance> for LaunchedInstance {
    fn from(instance: OciInstance) -> Self {
        Self {
            id: instance.id,
            display_name: instance.display_name,
            availability_domain: instance.availability_domain,
            lifecycle_state: instance.lifecycle_state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OciAvailabilityDomain {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OciShape {
    pub shape: String,
    pub ocpus: Option<f32>,
    pub memory_in_gbs: Option<f32>,
}

impl From<OciShape> for ShapeInfo {
    fn from(shape: OciShape) -> Self {
        Self {
            shape: shape.shape,
            ocpus: shape.ocpus,
            memory_in_gbs: shape.memory_in_gbs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OciImage {
    pub id: String,
    pub display_name: String,
}

impl From<OciImage> for ImageInfo {
    fn from(image: OciImage) -> Self {
        Self {
            id: image.id,
            display_name: image.display_name,
        }
    }
}
