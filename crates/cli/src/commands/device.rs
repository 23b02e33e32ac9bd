//! Commands that talk to hardware

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use vsl_control::ControlSurface;
use vsl_hid_common::{HidApiBackend, HidBackend, HidDeviceInfo};

use crate::commands::load_config;
use crate::output;

/// List HID interfaces, filtered to the configured device unless `all`.
pub fn enumerate(
    config: Option<&Path>,
    vid: Option<u16>,
    pid: Option<u16>,
    all: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let mut backend = HidApiBackend::new().context("Failed to initialise HID")?;
    let devices = backend.enumerate()?;

    // An explicit --vid without --pid lists every product of that vendor.
    let vendor_id = vid.unwrap_or(config.device.vendor_id);
    let product_id = match (vid, pid) {
        (_, Some(pid)) => Some(pid),
        (Some(_), None) => None,
        (None, None) => Some(config.device.product_id),
    };
    let mut matching: Vec<HidDeviceInfo> = devices
        .into_iter()
        .filter(|d| {
            all || (d.vendor_id == vendor_id && product_id.is_none_or(|p| d.product_id == p))
        })
        .collect();
    matching.sort_by(|a, b| {
        (a.vendor_id, a.product_id, a.interface_number)
            .cmp(&(b.vendor_id, b.product_id, b.interface_number))
    });

    info!("{} matching interfaces", matching.len());
    output::print_device_list(&matching, json);
    Ok(())
}

/// Encode `position` for `parameter` and write it to the device.
pub fn set(config: Option<&Path>, parameter: &str, position: f32, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let backend = HidApiBackend::new().context("Failed to initialise HID")?;
    let mut surface = ControlSurface::from_config(&config, backend);

    let write = surface.set_position(parameter, position)?;
    let kind = surface.entry(parameter)?.kind;
    let device = surface
        .transport()
        .device_info()
        .map(HidDeviceInfo::display_name);
    output::print_parameter_write(parameter, kind, &write, device.as_deref(), json);
    surface.close();
    Ok(())
}
