use crate::utils;
use colored::Colorize;
use skylaunch_cloud::ComputeProvider;
use skylaunch_cloud_oci::OciProvider;
use skylaunch_config::LaunchConfig;
use std::process::ExitCode;

pub async fn handle() -> anyhow::Result<ExitCode> {
    // Pick up the OCI profile from the config when there is one
    let launch = skylaunch_config::find_config_file()
        .ok()
        .and_then(|path| LaunchConfig::load(path).ok());
    let provider = OciProvider::new(utils::build_cli(launch.as_ref()));

    println!(
        "{}",
        format!("Checking {} access...", provider.display_name()).blue()
    );

    let status = provider.check_auth().await?;
    if status.authenticated {
        println!("{}", "✓ oci CLI is installed and authenticated".green().bold());
        if let Some(info) = status.account_info {
            println!("  {}", info.cyan());
        }
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", "✗ oci CLI is not ready".red().bold());
        if let Some(error) = status.error {
            eprintln!("  {}", error);
        }
        Ok(ExitCode::FAILURE)
    }
}
