//! Conversion options from a JSON file and command-line flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nestify_core::ConvertOptions;

use crate::cli::Cli;

/// Read conversion options from a JSON file. Missing keys keep their
/// defaults; unknown keys are an error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid options
/// object.
pub fn load_config(path: &Path) -> Result<ConvertOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// The options for this run: the config file (or defaults), then flags.
///
/// # Errors
///
/// Returns an error if `--config` names an unreadable or invalid file.
pub fn resolve_options(cli: &Cli) -> Result<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConvertOptions::default(),
    };

    if cli.no_comments {
        options.comments = false;
    }
    if cli.flat {
        options.nest = false;
    }
    if cli.max_depth.is_some() {
        options.max_depth = cli.max_depth;
    }
    if cli.variables {
        options.variables = true;
    }
    if let Some(threshold) = cli.var_threshold {
        options.var_threshold = threshold;
    }
    if cli.group_properties {
        options.group_properties = true;
    }

    Ok(options)
}
