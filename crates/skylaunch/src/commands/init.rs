use crate::render;
use crate::utils;
use anyhow::Context;
use colored::Colorize;
use skylaunch_cloud::{ComputeProvider, ImageInfo};
use skylaunch_cloud_oci::OciProvider;
use skylaunch_config::LaunchConfig;
use std::path::PathBuf;

const DEFAULT_SSH_KEY_FILE: &str = "~/.ssh/id_rsa.pub";

pub async fn handle(config: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match config {
        Some(path) => path,
        None => skylaunch_config::default_config_path()?,
    };
    let provider = OciProvider::new(utils::build_cli(None));

    render::clear_screen()?;
    render::print_banner();

    let compartment_id = utils::prompt_required("Enter the Compartment OCID: ")?;
    let subnet_id = utils::prompt_required("Enter the Subnet OCID: ")?;

    println!("{}", "Fetching list of available shapes...".blue());
    let shapes = provider
        .list_shapes(&compartment_id)
        .await
        .context("Error fetching shapes")?;
    if shapes.is_empty() {
        anyhow::bail!("No shapes are available in compartment {}", compartment_id);
    }

    render::clear_screen()?;
    render::print_banner();
    for (idx, shape) in shapes.iter().enumerate() {
        println!(
            "{}",
            format!(
                "{}: {} (OCPUs: {}, Memory: {} GB)",
                idx + 1,
                shape.shape,
                describe(shape.ocpus),
                describe(shape.memory_in_gbs)
            )
            .yellow()
        );
    }
    let index = utils::select_index(
        "Select a shape by entering the corresponding number: ",
        shapes.len(),
    )?;
    let shape = shapes[index].shape.clone();

    println!(
        "{}",
        format!("Fetching Ubuntu images for {}...", shape).blue()
    );
    let images = ubuntu_images(
        provider
            .list_images(&compartment_id, &shape)
            .await
            .context("Error fetching images")?,
    );
    if images.is_empty() {
        anyhow::bail!("No Ubuntu images found for shape {}", shape);
    }

    render::clear_screen()?;
    render::print_banner();
    for (idx, image) in images.iter().enumerate() {
        println!("{}", format!("{}: {}", idx + 1, image.display_name).yellow());
    }
    let index = utils::select_index(
        "Select an image by entering the corresponding number: ",
        images.len(),
    )?;
    let image_id = images[index].id.clone();

    let mut launch = LaunchConfig::new(compartment_id, subnet_id, shape, image_id);

    let use_ssh = utils::prompt("Do you want to use an SSH public key? (yes/no): ")?;
    if use_ssh.eq_ignore_ascii_case("yes") || use_ssh.eq_ignore_ascii_case("y") {
        let key_file = utils::prompt_or("Enter the SSH public key file path", DEFAULT_SSH_KEY_FILE)?;
        launch.ssh_public_key_file = Some(expand_home(&key_file));
    }

    launch.instance_name = utils::prompt_or("Enter the instance name", &launch.instance_name)?;
    launch.ocpus = utils::prompt_number("Enter the number of OCPUs", launch.ocpus)?;
    launch.memory_in_gbs = utils::prompt_number("Enter the memory in GBs", launch.memory_in_gbs)?;

    launch.validate()?;
    launch
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!();
    println!("{}", "✓ Configuration saved".green().bold());
    println!("  {}", path.display().to_string().cyan());
    println!();
    println!("{}", "Start acquiring the instance with:".bold());
    println!("  {} launch", "skylaunch".cyan());

    Ok(())
}

fn describe(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn ubuntu_images(images: Vec<ImageInfo>) -> Vec<ImageInfo> {
    images
        .into_iter()
        .filter(|image| image.display_name.contains("Ubuntu"))
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageInfo {
        ImageInfo {
            id: format!("ocid1.image.oc1..{}", name.len()),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_only_ubuntu_images_offered() {
        let images = ubuntu_images(vec![
            image("Canonical-Ubuntu-22.04-aarch64-2024.01.12-0"),
            image("Oracle-Linux-8.9-aarch64-2024.01.26-0"),
            image("Canonical-Ubuntu-24.04-aarch64-2024.02.18-0"),
        ]);
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|i| i.display_name.contains("Ubuntu")));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home("/etc/keys/id.pub"),
            PathBuf::from("/etc/keys/id.pub")
        );
    }

    #[test]
    fn test_describe_missing_value() {
        assert_eq!(describe(None), "-");
        assert_eq!(describe(Some(4.0)), "4");
    }
}
