//! Output formatting for CLI responses

use std::path::Path;

use anyhow::Error;
use colored::*;
use serde_json::{Value, json};
use vsl_control::{
    ConfigError, ControlError, ParameterEntry, ParameterWrite, TransportError, VslConfig,
};
use vsl_hid_common::HidDeviceInfo;
use vsl_hid_protocol::{ParameterKind, ParsedReport, is_vsl_product};

use crate::error::CliError;

/// One row of a sweep table.
#[derive(Debug, Clone, Copy)]
pub struct SweepRow {
    pub position: f32,
    pub dsp_value: f32,
    pub encoded_value: u16,
}

/// A parsed report plus, when its ID is configured, the parameter it
/// addresses with the decoded DSP value and position.
#[derive(Debug)]
pub struct DecodedReport<'a> {
    pub parsed: ParsedReport,
    pub parameter: Option<(&'a ParameterEntry, f32, f32)>,
}

fn print_json(value: &Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format {} as JSON: {}", what, e),
    }
}

fn product_tag(device: &HidDeviceInfo) -> Option<&'static str> {
    is_vsl_product(device.vendor_id, device.product_id).then_some("AudioBox VSL")
}

fn unit_suffix(kind: ParameterKind) -> String {
    kind.unit().map(|u| format!(" {u}")).unwrap_or_default()
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<ControlError>() {
        return match e {
            ControlError::UnknownParameter(_) => "UnknownParameter",
            ControlError::Transport(t) => transport_error_name(t),
        };
    }
    if let Some(e) = error.downcast_ref::<TransportError>() {
        return transport_error_name(e);
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return "ConfigError";
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidArgument(_)) => "InvalidArgument",
        Some(CliError::InvalidReport(_)) => "InvalidReport",
        None => "Error",
    }
}

fn transport_error_name(error: &TransportError) -> &'static str {
    match error {
        TransportError::DeviceNotFound { .. } => "DeviceNotFound",
        TransportError::DeviceOpenFailure { .. } => "DeviceOpenFailure",
        TransportError::WriteFailure { .. } => "WriteFailure",
        TransportError::NotOpen => "NotOpen",
        TransportError::Backend(_) => "Backend",
    }
}

/// Print enumerated HID interfaces
pub fn print_device_list(devices: &[HidDeviceInfo], json: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "devices": devices
            }),
            "device list",
        );
        return;
    }

    if devices.is_empty() {
        println!("{}", "No matching HID interfaces found".yellow());
        return;
    }

    println!("{}", "HID Interfaces:".bold());
    for device in devices {
        let (marker, tag) = match product_tag(device) {
            Some(tag) => ("●".green(), format!(" [{tag}]")),
            None => ("○".dimmed(), String::new()),
        };
        println!(
            "  {} {} ({:04x}:{:04x}){}",
            marker,
            device.display_name().bold(),
            device.vendor_id,
            device.product_id,
            tag.cyan()
        );
        println!(
            "    Interface: {}  Usage: {:04x}:{:04x}",
            device.interface_number, device.usage_page, device.usage
        );
        if let Some(serial) = &device.serial_number {
            println!("    Serial: {}", serial);
        }
        println!("    Path: {}", device.path.dimmed());
    }
}

/// Print the result of encoding (and possibly sending) one position.
pub fn print_parameter_write(
    name: &str,
    kind: ParameterKind,
    write: &ParameterWrite,
    device: Option<&str>,
    json: bool,
) {
    let packet = write.report.packet();
    let hex = write.report.hex_dump(write.report.payload().len());

    if json {
        print_json(
            &json!({
                "success": true,
                "parameter": name,
                "kind": kind,
                "position": write.position,
                "dsp_value": write.dsp_value,
                "unit": kind.unit(),
                "param_id": packet.param_id,
                "encoded_value": packet.encoded_value,
                "report": hex,
                "sent_to": device,
            }),
            "parameter write",
        );
        return;
    }

    println!("{} ({})", name.bold(), kind);
    println!("  Position:  {:.4}", write.position);
    println!("  DSP value: {:.4}{}", write.dsp_value, unit_suffix(kind));
    println!(
        "  Encoded:   {} (0x{:04X})",
        packet.encoded_value, packet.encoded_value
    );
    println!("  Report:    {}", hex.cyan());
    if let Some(device) = device {
        println!("  {} {}", "✓ Sent to".green(), device);
    }
}

/// Print a position sweep as a table
pub fn print_sweep(entry: &ParameterEntry, rows: &[SweepRow], json: bool) {
    if json {
        let rows: Vec<Value> = rows
            .iter()
            .map(|r| {
                json!({
                    "position": r.position,
                    "dsp_value": r.dsp_value,
                    "encoded_value": r.encoded_value,
                })
            })
            .collect();
        print_json(
            &json!({
                "success": true,
                "parameter": entry.name,
                "kind": entry.kind,
                "unit": entry.kind.unit(),
                "rows": rows
            }),
            "sweep",
        );
        return;
    }

    println!(
        "{} ({}, id 0x{:04X})",
        entry.name.bold(),
        entry.kind,
        entry.descriptor.id()
    );
    println!(
        "  {:>8}  {:>12}  {:>7}  {}",
        "position".bold(),
        "dsp value".bold(),
        "encoded".bold(),
        "hex".bold()
    );
    for row in rows {
        println!(
            "  {:>8.4}  {:>12.4}  {:>7}  0x{:04X}",
            row.position, row.dsp_value, row.encoded_value, row.encoded_value
        );
    }
}

/// Print a decoded report
pub fn print_decoded(decoded: &DecodedReport<'_>, json: bool) {
    let parsed = &decoded.parsed;

    if json {
        let parameter = decoded.parameter.map(|(entry, dsp_value, position)| {
            json!({
                "name": entry.name,
                "kind": entry.kind,
                "dsp_value": dsp_value,
                "unit": entry.kind.unit(),
                "position": position,
            })
        });
        print_json(
            &json!({
                "success": true,
                "report_id": parsed.report_id,
                "header": parsed.header,
                "param_id": parsed.packet.param_id,
                "encoded_value": parsed.packet.encoded_value,
                "parameter": parameter,
            }),
            "decoded report",
        );
        return;
    }

    println!("{}", "Decoded Report:".bold());
    println!("  Report ID: 0x{:02X}", parsed.report_id);
    if let Some(header) = parsed.header {
        println!("  Header:    0x{:04X}", header);
    }
    println!("  Param ID:  0x{:04X}", parsed.packet.param_id);
    println!(
        "  Encoded:   {} (0x{:04X})",
        parsed.packet.encoded_value, parsed.packet.encoded_value
    );
    match decoded.parameter {
        Some((entry, dsp_value, position)) => {
            println!("  Parameter: {} ({})", entry.name.bold(), entry.kind);
            println!("  DSP value: {:.4}{}", dsp_value, unit_suffix(entry.kind));
            println!("  Position:  {:.4}", position);
        }
        None => println!("  Parameter: {}", "unknown".yellow()),
    }
}

/// Print a validated config
pub fn print_config_summary(config: &VslConfig, path: Option<&Path>, json: bool) {
    let source = path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string());

    if json {
        print_json(
            &json!({
                "success": true,
                "source": source,
                "device": config.device,
                "wire": config.wire,
                "parameters": config.parameters,
            }),
            "config",
        );
        return;
    }

    println!("{} {}", "✓ Config valid:".green(), source);
    println!(
        "  Device:     {:04x}:{:04x} report 0x{:02X} ({:?})",
        config.device.vendor_id,
        config.device.product_id,
        config.device.report_id,
        config.device.report_kind
    );
    if let Some(interface) = config.device.interface_number {
        println!("  Interface:  {}", interface);
    }
    println!("  Layout:     {}", config.wire.layout);
    println!("  Scale:      {}", config.wire.scale);
    println!("  Parameters: {}", config.parameters.len());
    for entry in &config.parameters {
        println!(
            "    {} {} ({}, id 0x{:04X})",
            "•".cyan(),
            entry.name,
            entry.kind,
            entry.descriptor.id()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_tag_marks_known_interfaces() {
        let vsl = HidDeviceInfo::new(0x194F, 0x0101, "/dev/hidraw0");
        assert_eq!(product_tag(&vsl), Some("AudioBox VSL"));

        let other = HidDeviceInfo::new(0x194F, 0x0102, "/dev/hidraw1");
        assert_eq!(product_tag(&other), None);
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(unit_suffix(ParameterKind::Frequency), " Hz");
        assert_eq!(unit_suffix(ParameterKind::Gain), "");
    }

    #[test]
    fn test_error_type_names() {
        let unknown = Error::new(ControlError::UnknownParameter("x".to_string()));
        assert_eq!(error_type_name(&unknown), "UnknownParameter");

        let not_open = Error::new(ControlError::Transport(TransportError::NotOpen));
        assert_eq!(error_type_name(&not_open), "NotOpen");

        let config = Error::new(ConfigError::Invalid("bad".to_string()));
        assert_eq!(error_type_name(&config), "ConfigError");

        let bad = Error::new(CliError::InvalidArgument("steps".to_string()));
        assert_eq!(error_type_name(&bad), "InvalidArgument");

        assert_eq!(error_type_name(&anyhow::anyhow!("plain")), "Error");
    }
}
