//! Persisted launch request
//!
//! A flat JSON document describing the instance to acquire plus optional
//! loop tuning. Written by `skylaunch init`, read once before a launch run.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_instance_name() -> String {
    "Default-Instance".to_string()
}

fn default_ocpus() -> u32 {
    2
}

fn default_memory_in_gbs() -> u32 {
    12
}

fn default_backoff_floor_secs() -> u64 {
    60
}

fn default_backoff_ceiling_secs() -> u64 {
    600
}

fn default_attempt_delay_secs() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub compartment_id: String,
    pub subnet_id: String,
    pub shape: String,
    pub image_id: String,

    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    #[serde(default = "default_ocpus")]
    pub ocpus: u32,

    #[serde(default = "default_memory_in_gbs")]
    pub memory_in_gbs: u32,

    /// Inline public key material; takes precedence over `ssh_public_key_file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_public_key_file: Option<PathBuf>,

    /// Candidate availability domains in visiting order. Empty means "ask the provider".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_domains: Vec<String>,

    #[serde(default = "default_backoff_floor_secs")]
    pub backoff_floor_secs: u64,

    #[serde(default = "default_backoff_ceiling_secs")]
    pub backoff_ceiling_secs: u64,

    #[serde(default = "default_attempt_delay_secs")]
    pub attempt_delay_secs: u64,

    /// Stop after this many fruitless rounds. Absent means retry forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oci_config_file: Option<PathBuf>,
}

impl LaunchConfig {
    /// A config with the required fields set and everything else defaulted
    pub fn new(
        compartment_id: impl Into<String>,
        subnet_id: impl Into<String>,
        shape: impl Into<String>,
        image_id: impl Into<String>,
    ) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            subnet_id: subnet_id.into(),
            shape: shape.into(),
            image_id: image_id.into(),
            instance_name: default_instance_name(),
            ocpus: default_ocpus(),
            memory_in_gbs: default_memory_in_gbs(),
            ssh_public_key: None,
            ssh_public_key_file: None,
            availability_domains: Vec::new(),
            backoff_floor_secs: default_backoff_floor_secs(),
            backoff_ceiling_secs: default_backoff_ceiling_secs(),
            attempt_delay_secs: default_attempt_delay_secs(),
            max_rounds: None,
            oci_profile: None,
            oci_config_file: None,
        }
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: LaunchConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("compartment_id", &self.compartment_id),
            ("subnet_id", &self.subnet_id),
            ("shape", &self.shape),
            ("image_id", &self.image_id),
            ("instance_name", &self.instance_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }

        if self.ocpus == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ocpus",
                reason: "1以上を指定してください".to_string(),
            });
        }
        if self.memory_in_gbs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "memory_in_gbs",
                reason: "1以上を指定してください".to_string(),
            });
        }
        if self.backoff_floor_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_floor_secs",
                reason: "1以上を指定してください".to_string(),
            });
        }
        if self.backoff_floor_secs > self.backoff_ceiling_secs {
            return Err(ConfigError::InvalidValue {
                field: "backoff_ceiling_secs",
                reason: format!(
                    "backoff_floor_secs ({1}) より小さい値です: {0}",
                    self.backoff_ceiling_secs, self.backoff_floor_secs
                ),
            });
        }
        if self.max_rounds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_rounds",
                reason: "1以上を指定してください（省略すると無制限に再試行）".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the public key: inline material first, then the key file
    pub fn resolve_ssh_public_key(&self) -> Result<Option<String>> {
        if let Some(ref key) = self.ssh_public_key {
            return Ok(Some(key.trim().to_string()));
        }
        match self.ssh_public_key_file {
            Some(ref path) => {
                let key = std::fs::read_to_string(path).map_err(|source| ConfigError::SshKey {
                    path: path.clone(),
                    source,
                })?;
                Ok(Some(key.trim().to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn backoff_floor(&self) -> Duration {
        Duration::from_secs(self.backoff_floor_secs)
    }

    pub fn backoff_ceiling(&self) -> Duration {
        Duration::from_secs(self.backoff_ceiling_secs)
    }

    pub fn attempt_delay(&self) -> Duration {
        Duration::from_secs(self.attempt_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"{
        "compartment_id": "ocid1.compartment.oc1..aaa",
        "subnet_id": "ocid1.subnet.oc1..bbb",
        "shape": "VM.Standard.A1.Flex",
        "image_id": "ocid1.image.oc1..ccc"
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config: LaunchConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.instance_name, "Default-Instance");
        assert_eq!(config.ocpus, 2);
        assert_eq!(config.memory_in_gbs, 12);
        assert_eq!(config.backoff_floor(), Duration::from_secs(60));
        assert_eq!(config.backoff_ceiling(), Duration::from_secs(600));
        assert_eq!(config.attempt_delay(), Duration::from_secs(5));
        assert!(config.max_rounds.is_none());
        assert!(config.availability_domains.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_null_key_file_accepted() {
        let json = r#"{
            "compartment_id": "c", "subnet_id": "s", "shape": "VM.Standard.E2.1.Micro",
            "image_id": "i", "ssh_public_key_file": null, "instance_name": "micro-1",
            "ocpus": 1, "memory_in_gbs": 1
        }"#;
        let config: LaunchConfig = serde_json::from_str(json).unwrap();
        assert!(config.ssh_public_key_file.is_none());
        assert_eq!(config.resolve_ssh_public_key().unwrap(), None);
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("skylaunch.json");
        fs::write(&path, r#"{"compartment_id": "c", "subnet_id": "s"}"#).unwrap();

        let err = LaunchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("skylaunch.json"));
    }

    #[test]
    fn test_blank_required_field_rejected() {
        let config = LaunchConfig::new("c", "  ", "VM.Standard.A1.Flex", "i");
        assert!(matches!(config.validate(), Err(ConfigError::MissingField("subnet_id"))));
    }

    #[test]
    fn test_backoff_bounds_validated() {
        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.backoff_floor_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "backoff_floor_secs", .. })
        ));

        config.backoff_floor_secs = 700;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "backoff_ceiling_secs", .. })
        ));
    }

    #[test]
    fn test_zero_sizing_rejected() {
        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.ocpus = 0;
        assert!(config.validate().is_err());

        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.max_rounds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("skylaunch.json");

        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.availability_domains = vec!["AD-1".to_string(), "AD-2".to_string()];
        config.max_rounds = Some(10);
        config.save(&path).unwrap();

        let loaded = LaunchConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        // Unset optional fields are left out of the document
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("ssh_public_key"));
    }

    #[test]
    fn test_ssh_key_resolution() {
        let temp_dir = tempfile::tempdir().unwrap();
        let key_path = temp_dir.path().join("id_ed25519.pub");
        fs::write(&key_path, "ssh-ed25519 AAAAC3Nz test@host\n").unwrap();

        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.ssh_public_key_file = Some(key_path);
        assert_eq!(
            config.resolve_ssh_public_key().unwrap().as_deref(),
            Some("ssh-ed25519 AAAAC3Nz test@host")
        );

        config.ssh_public_key = Some("ssh-rsa INLINE".to_string());
        assert_eq!(
            config.resolve_ssh_public_key().unwrap().as_deref(),
            Some("ssh-rsa INLINE")
        );
    }

    #[test]
    fn test_missing_ssh_key_file() {
        let mut config = LaunchConfig::new("c", "s", "VM.Standard.A1.Flex", "i");
        config.ssh_public_key_file = Some(PathBuf::from("/nonexistent/skylaunch/id_rsa.pub"));
        assert!(matches!(
            config.resolve_ssh_public_key(),
            Err(ConfigError::SshKey { .. })
        ));
    }
}
