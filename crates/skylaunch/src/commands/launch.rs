use crate::render::{self, TerminalSink};
use crate::utils;
use colored::Colorize;
use skylaunch_core::{Outcome, ProvisioningLoop, StatusReporter, TokioSleeper};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status after Ctrl-C, as a shell would report SIGINT
const EXIT_INTERRUPTED: u8 = 130;

pub async fn handle(
    config: Option<PathBuf>,
    max_rounds: Option<u64>,
    zones: Vec<String>,
) -> anyhow::Result<ExitCode> {
    let (_, launch) = utils::load_config(config)?;
    let request = utils::build_request(&launch, &zones)?;
    let settings = utils::loop_settings(&launch, max_rounds)?;
    let provider = utils::build_provider(&launch);

    render::clear_screen()?;
    render::print_banner();

    let mut provisioner = ProvisioningLoop::new(provider, TokioSleeper, settings)?
        .with_reporter(StatusReporter::new(TerminalSink));

    let outcome = tokio::select! {
        outcome = provisioner.run(&request) => outcome,
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{}", "Interrupted. No instance was created.".yellow());
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
    };

    println!();
    match outcome {
        Outcome::Succeeded { resource_id, zone } => {
            println!(
                "{}",
                format!(
                    "✓ Successfully created instance {} with OCID {} in availability domain {}",
                    request.display_name, resource_id, zone
                )
                .green()
                .bold()
            );
            Ok(ExitCode::SUCCESS)
        }
        Outcome::QuotaRejected { reason } => {
            eprintln!("{}", "✗ Free-tier limit would be exceeded".red().bold());
            eprintln!("  {}", reason);
            Ok(ExitCode::FAILURE)
        }
        Outcome::AbortedByError { detail } => {
            eprintln!("{}", "✗ Launch aborted".red().bold());
            eprintln!("  {}", detail);
            Ok(ExitCode::FAILURE)
        }
        Outcome::Exhausted { rounds } => {
            eprintln!(
                "{}",
                format!("✗ No capacity found after {} round(s)", rounds)
                    .red()
                    .bold()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}
