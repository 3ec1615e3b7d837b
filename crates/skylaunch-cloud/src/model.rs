//! Provider-neutral resource types

use serde::{Deserialize, Serialize};

/// A compute instance as reported by a provider listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Provider-specific instance ID
    pub id: String,

    /// Human readable name
    pub display_name: String,

    /// Shape name (e.g., "VM.Standard.A1.Flex")
    pub shape: String,

    /// Allocated OCPUs
    pub ocpus: f32,

    /// Allocated memory in GB
    pub memory_in_gbs: f32,

    /// Current lifecycle state
    pub lifecycle_state: LifecycleState,
}

impl InstanceInfo {
    /// Whether the instance still counts against account limits
    pub fn is_live(&self) -> bool {
        self.lifecycle_state.is_live()
    }
}

/// Instance lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Moving,
    Provisioning,
    Running,
    Starting,
    Stopping,
    Stopped,
    CreatingImage,
    Terminating,
    Terminated,
    #[serde(other)]
    Unknown,
}

impl LifecycleState {
    /// Terminating and terminated instances no longer consume quota
    pub fn is_live(&self) -> bool {
        !matches!(self, LifecycleState::Terminating | LifecycleState::Terminated)
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Moving => write!(f, "MOVING"),
            LifecycleState::Provisioning => write!(f, "PROVISIONING"),
            LifecycleState::Running => write!(f, "RUNNING"),
            LifecycleState::Starting => write!(f, "STARTING"),
            LifecycleState::Stopping => write!(f, "STOPPING"),
            LifecycleState::Stopped => write!(f, "STOPPED"),
            LifecycleState::CreatingImage => write!(f, "CREATING_IMAGE"),
            LifecycleState::Terminating => write!(f, "TERMINATING"),
            LifecycleState::Terminated => write!(f, "TERMINATED"),
            LifecycleState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Everything needed for one launch call against one availability domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub compartment_id: String,
    pub availability_domain: String,
    pub subnet_id: String,
    pub image_id: String,
    pub shape: String,
    pub ocpus: u32,
    pub memory_in_gbs: u32,
    pub display_name: String,

    /// Public key material injected as `ssh_authorized_keys` metadata
    pub ssh_authorized_keys: Option<String>,
}

/// Result of a successful launch call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchedInstance {
    pub id: String,
    pub display_name: String,
    pub availability_domain: String,
    pub lifecycle_state: LifecycleState,
}

/// A shape offered in the compartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInfo {
    pub shape: String,
    pub ocpus: Option<f32>,
    pub memory_in_gbs: Option<f32>,
}

/// A bootable image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: String,
    pub display_name: String,
}
