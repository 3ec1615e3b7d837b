//! Immutable description of the instance to acquire

use skylaunch_cloud::LaunchSpec;

/// What to launch and where to try it
///
/// Built once before the loop starts; the loop only ever borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningRequest {
    pub compartment_id: String,
    pub subnet_id: String,
    pub image_id: String,
    pub shape: String,
    pub ocpus: u32,
    pub memory_in_gbs: u32,
    pub display_name: String,
    pub ssh_public_key: Option<String>,

    /// Candidate zones in visiting order. Empty means "discover at run time".
    pub zones: Vec<String>,
}

impl ProvisioningRequest {
    pub fn new(
        compartment_id: impl Into<String>,
        subnet_id: impl Into<String>,
        image_id: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            subnet_id: subnet_id.into(),
            image_id: image_id.into(),
            shape: shape.into(),
            ocpus: 1,
            memory_in_gbs: 1,
            display_name: "Default-Instance".to_string(),
            ssh_public_key: None,
            zones: Vec::new(),
        }
    }

    pub fn with_sizing(mut self, ocpus: u32, memory_in_gbs: u32) -> Self {
        self.ocpus = ocpus;
        self.memory_in_gbs = memory_in_gbs;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_ssh_public_key(mut self, key: impl Into<String>) -> Self {
        self.ssh_public_key = Some(key.into());
        self
    }

    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    /// The launch call for one zone
    pub fn launch_spec(&self, zone: &str) -> LaunchSpec {
        LaunchSpec {
            compartment_id: self.compartment_id.clone(),
            availability_domain: zone.to_string(),
            subnet_id: self.subnet_id.clone(),
            image_id: self.image_id.clone(),
            shape: self.shape.clone(),
            ocpus: self.ocpus,
            memory_in_gbs: self.memory_in_gbs,
            display_name: self.display_name.clone(),
            ssh_authorized_keys: self.ssh_public_key.clone(),
        }
    }
}
