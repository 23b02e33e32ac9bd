//! Config inspection

use std::path::Path;

use anyhow::Result;

use crate::commands::load_config;
use crate::output;

/// Load, validate and summarize the config. Loading already validates, so
/// reaching the summary means the file is usable.
pub fn check(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    output::print_config_summary(&config, config_path, json);
    Ok(())
}
