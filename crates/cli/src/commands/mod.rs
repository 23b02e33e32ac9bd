//! Command implementations for vslctl

pub mod config;
pub mod device;
pub mod encode;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use vsl_control::VslConfig;

use crate::error::CliError;

/// AudioBox 22 VSL description used when no `--config` is given.
const BUILTIN_CONFIG: &str = include_str!("../../../../config/audiobox22-vsl.yaml");

/// Load the config at `path`, or the built-in one.
pub fn load_config(path: Option<&Path>) -> Result<VslConfig> {
    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            Ok(VslConfig::from_path(path)?)
        }
        None => {
            debug!("Using built-in AudioBox 22 VSL config");
            VslConfig::from_yaml_str(BUILTIN_CONFIG).context("built-in config is invalid")
        }
    }
}

/// Parse a USB ID given as `0x194f` or decimal.
pub fn parse_hex_id(s: &str) -> Result<u16> {
    let trimmed = s.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16).with_context(|| format!("Invalid hex ID: {s}"))
    } else {
        trimmed
            .parse::<u16>()
            .with_context(|| format!("Invalid ID: {s}"))
    }
}

/// Parse report bytes written as hex pairs. Spaces, colons, commas and an
/// optional `0x` on each byte are accepted.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, CliError> {
    let digits: String = s
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk
                .strip_prefix("0x")
                .or_else(|| chunk.strip_prefix("0X"))
                .unwrap_or(chunk)
        })
        .collect();

    if digits.is_empty() {
        return Err(CliError::InvalidReport("no bytes given".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(CliError::InvalidReport(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or_else(|| {
                    CliError::InvalidReport(format!(
                        "'{}' is not a hex byte",
                        String::from_utf8_lossy(pair)
                    ))
                })
        })
        .collect()
}
