//! Offline encode/decode commands. None of these open a device.

use std::path::Path;

use anyhow::Result;
use tracing::warn;
use vsl_control::{ControlError, ParameterEntry, VslConfig, encode_position};
use vsl_hid_protocol::{decode_packet, parse_report};

use crate::commands::{load_config, parse_hex_bytes};
use crate::error::CliError;
use crate::output::{self, DecodedReport, SweepRow};

fn lookup<'a>(config: &'a VslConfig, name: &str) -> Result<&'a ParameterEntry, ControlError> {
    config
        .parameter(name)
        .ok_or_else(|| ControlError::UnknownParameter(name.to_string()))
}

pub fn encode(config: Option<&Path>, parameter: &str, position: f32, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let entry = lookup(&config, parameter)?;
    let write = encode_position(&config.encoder(), entry, position);
    output::print_parameter_write(parameter, entry.kind, &write, None, json);
    Ok(())
}

/// Encode `steps` evenly spaced positions from 0.0 to 1.0.
pub fn sweep(config: Option<&Path>, parameter: &str, steps: u16, json: bool) -> Result<()> {
    if steps < 2 {
        return Err(CliError::InvalidArgument(format!(
            "--steps must be at least 2, got {steps}"
        ))
        .into());
    }

    let config = load_config(config)?;
    let entry = lookup(&config, parameter)?;
    let encoder = config.encoder();
    let last = f32::from(steps - 1);
    let rows: Vec<SweepRow> = (0..steps)
        .map(|i| {
            let write = encode_position(&encoder, entry, f32::from(i) / last);
            SweepRow {
                position: write.position,
                dsp_value: write.dsp_value,
                encoded_value: write.report.packet().encoded_value,
            }
        })
        .collect();

    output::print_sweep(entry, &rows, json);
    Ok(())
}

/// Decode a captured report using the configured layout and scale.
pub fn decode(config: Option<&Path>, report: &str, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let bytes = parse_hex_bytes(report)?;
    let layout = config.wire.layout;
    let parsed = parse_report(&bytes, layout).ok_or_else(|| {
        CliError::InvalidReport(format!(
            "{} bytes is shorter than the {} layout ({} bytes)",
            bytes.len(),
            layout,
            layout.payload_len()
        ))
    })?;

    if parsed.report_id != config.device.report_id {
        warn!(
            "Report ID 0x{:02X} differs from configured 0x{:02X}",
            parsed.report_id, config.device.report_id
        );
    }

    let entry = config.parameter_by_id(parsed.packet.param_id);
    let values = entry.map(|entry| {
        let (dsp_value, position) = decode_packet(
            &parsed.packet,
            entry.kind,
            &config.quantizer(),
            &entry.descriptor,
        );
        (entry, dsp_value, position)
    });
    if values.is_none() {
        warn!(
            "No configured parameter has ID 0x{:04X}",
            parsed.packet.param_id
        );
    }

    output::print_decoded(
        &DecodedReport {
            parsed,
            parameter: values,
        },
        json,
    );
    Ok(())
}
