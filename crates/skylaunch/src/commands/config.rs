use crate::render;
use crate::utils;
use colored::Colorize;
use skylaunch_cloud::ComputeProvider;
use std::path::PathBuf;

pub async fn handle_show(config: Option<PathBuf>) -> anyhow::Result<()> {
    let (path, launch) = utils::load_config(config)?;
    let provider = utils::build_provider(&launch);

    render::print_banner();
    println!("{}", "Current Configuration:".green().bold());
    println!("  {}", path.display().to_string().dimmed());
    println!();

    let fields = match serde_json::to_value(&launch)? {
        serde_json::Value::Object(fields) => fields,
        other => anyhow::bail!("Unexpected configuration layout: {}", other),
    };

    for (key, value) in &fields {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        if key == "image_id" {
            match provider.get_image(&value).await {
                Ok(image) => {
                    println!(
                        "{}",
                        format!("image_name: {} (OCID: {})", image.display_name, value).yellow()
                    );
                    continue;
                }
                Err(e) => tracing::warn!("Unable to retrieve image details: {}", e),
            }
        }
        println!("{}", format!("{}: {}", key, value).yellow());
    }

    Ok(())
}
