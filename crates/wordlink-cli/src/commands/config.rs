//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use wordlink_core::{Config, OwnerId, RenderMode};

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "owner_id": config.owner_id,
                    "render_mode": config.render_mode,
                    "log_file": config.log_file,
                    "log_level": config.log_level()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:    {}", config.data_dir.display());
            println!("  owner_id:    {}", config.owner_id);
            println!("  render_mode: {}", config.render_mode);
            println!(
                "  log_file:    {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!("  log_level:   {}", config.log_level());
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "owner_id" => {
            config.owner_id = value
                .parse::<OwnerId>()
                .context("Invalid value for owner_id. Use an integer.")?;
        }
        "render_mode" => {
            config.render_mode = value.parse::<RenderMode>().map_err(anyhow::Error::msg)?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        "log_level" => {
            config.log_level = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, owner_id, render_mode, log_file, log_level",
                key
            );
        }
    }
    Ok(())
}
