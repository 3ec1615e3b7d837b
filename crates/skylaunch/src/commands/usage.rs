use crate::utils;
use anyhow::Context;
use colored::Colorize;
use skylaunch_cloud::ComputeProvider;
use skylaunch_core::{QuotaGuard, QuotaSnapshot, QuotaVerdict};
use std::path::PathBuf;

pub async fn handle(config: Option<PathBuf>) -> anyhow::Result<()> {
    let (_, launch) = utils::load_config(config)?;
    let request = utils::build_request(&launch, &[])?;
    let provider = utils::build_provider(&launch);
    let guard = QuotaGuard::default();

    println!(
        "{}",
        "Checking current instances and resource usage in account...".blue()
    );
    let instances = provider
        .list_instances(&launch.compartment_id)
        .await
        .context("Failed to list instances")?;

    if instances.is_empty() {
        println!("No instances found!");
    } else {
        println!("{} instance(s) found:", instances.len());
        for instance in &instances {
            let line = format!(
                "  {} - {} - {} ocpu(s) - {} GB(s) | State: {}",
                instance.display_name,
                instance.shape,
                instance.ocpus,
                instance.memory_in_gbs,
                instance.lifecycle_state
            );
            if instance.is_live() {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }

    let limits = guard.limits();
    let snapshot = QuotaSnapshot::from_instances(&instances, limits);
    println!();
    println!(
        "{}: {} of {} instances",
        limits.fixed_count_shape.cyan(),
        snapshot.fixed_count,
        limits.fixed_count_limit
    );
    println!(
        "{}: {} of {} OCPUs, {} of {} GB",
        limits.flexible_shape.cyan(),
        snapshot.flexible_ocpus,
        limits.flexible_ocpu_limit,
        snapshot.flexible_memory,
        limits.flexible_memory_limit
    );
    println!();

    match guard.evaluate(&request, &snapshot) {
        QuotaVerdict::Ok => println!(
            "{}",
            format!(
                "✓ {} ({} OCPUs / {} GB) fits within the free-tier limits",
                request.shape, request.ocpus, request.memory_in_gbs
            )
            .green()
        ),
        QuotaVerdict::Violation { reason } => println!("{}", format!("✗ {}", reason).red()),
    }

    Ok(())
}
