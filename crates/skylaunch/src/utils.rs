use anyhow::Context;
use colored::Colorize;
use skylaunch_cloud_oci::{OciCli, OciProvider};
use skylaunch_config::LaunchConfig;
use skylaunch_core::{BackoffConfig, LoopSettings, ProvisioningRequest};
use std::io::Write;
use std::path::PathBuf;

/// Locate and load the launch configuration; an explicit path wins over discovery
pub fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<(PathBuf, LaunchConfig)> {
    let path = match explicit {
        Some(path) => path,
        None => skylaunch_config::find_config_file()?,
    };
    let config = LaunchConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!("Configuration loaded from {}", path.display());
    Ok((path, config))
}

/// OCI CLI wrapper honouring the profile selection in the config
pub fn build_cli(config: Option<&LaunchConfig>) -> OciCli {
    let mut cli = OciCli::new();
    if let Some(config) = config {
        if let Some(ref profile) = config.oci_profile {
            cli = cli.with_profile(profile);
        }
        if let Some(ref file) = config.oci_config_file {
            cli = cli.with_config_file(file);
        }
    }
    cli
}

pub fn build_provider(config: &LaunchConfig) -> OciProvider {
    OciProvider::new(build_cli(Some(config)))
}

/// Turn the persisted config into a request; `zones` from the command line
/// replace the configured availability domains
pub fn build_request(
    config: &LaunchConfig,
    zones: &[String],
) -> anyhow::Result<ProvisioningRequest> {
    let mut request = ProvisioningRequest::new(
        &config.compartment_id,
        &config.subnet_id,
        &config.image_id,
        &config.shape,
    )
    .with_sizing(config.ocpus, config.memory_in_gbs)
    .with_display_name(&config.instance_name);

    if let Some(key) = config.resolve_ssh_public_key()? {
        request = request.with_ssh_public_key(key);
    }

    let zones = if zones.is_empty() {
        config.availability_domains.as_slice()
    } else {
        zones
    };
    Ok(request.with_zones(zones.iter().cloned()))
}

pub fn loop_settings(
    config: &LaunchConfig,
    max_rounds: Option<u64>,
) -> anyhow::Result<LoopSettings> {
    let backoff = BackoffConfig::new(config.backoff_floor(), config.backoff_ceiling())?;
    Ok(LoopSettings {
        backoff,
        attempt_delay: config.attempt_delay(),
        max_rounds: max_rounds.or(config.max_rounds),
        ..LoopSettings::default()
    })
}

/// Read one trimmed line after printing `label`
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label.cyan());
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn prompt_required(label: &str) -> anyhow::Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("{}", "A value is required.".yellow());
    }
}

pub fn prompt_or(label: &str, default: &str) -> anyhow::Result<String> {
    let value = prompt(&format!("{} (default: {}): ", label, default))?;
    Ok(if value.is_empty() {
        default.to_string()
    } else {
        value
    })
}

pub fn prompt_number(label: &str, default: u32) -> anyhow::Result<u32> {
    loop {
        let value = prompt_or(label, &default.to_string())?;
        match value.parse::<u32>() {
            Ok(n) if n > 0 => return Ok(n),
            _ => println!("{}", "Invalid input, please enter a positive number.".yellow()),
        }
    }
}

/// Ask for a 1-based choice among `len` listed items; returns the 0-based index
pub fn select_index(label: &str, len: usize) -> anyhow::Result<usize> {
    loop {
        let value = prompt(label)?;
        match parse_selection(&value, len) {
            Some(index) => return Ok(index),
            None => println!("{}", "Invalid selection, please try again.".yellow()),
        }
    }
}

fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}
