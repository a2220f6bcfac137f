//! Show or write the effective configuration.

use std::path::PathBuf;

use anyhow::Context;

use cutline_common::config::{config_file_path, EditorConfig};

pub fn run(config: &EditorConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);

    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config
            .save_to(&path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}
