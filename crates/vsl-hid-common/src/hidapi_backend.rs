//! `hidapi`-backed implementation of [`HidBackend`].

use std::ffi::CString;

use hidapi::{DeviceInfo, HidApi};
use tracing::{debug, warn};

use crate::{HidBackend, HidCommonError, HidCommonResult, HidDevice, HidDeviceInfo};

pub struct HidApiBackend {
    api: HidApi,
}

impl HidApiBackend {
    /// Initialise the platform HID library.
    ///
    /// # Errors
    ///
    /// Returns [`HidCommonError::Backend`] when `hid_init` fails.
    pub fn new() -> HidCommonResult<Self> {
        let api = HidApi::new().map_err(|e| HidCommonError::Backend(e.to_string()))?;
        Ok(Self { api })
    }

    fn lookup(&self, path: &str) -> Option<HidDeviceInfo> {
        self.api
            .device_list()
            .find(|d| d.path().to_string_lossy() == path)
            .map(to_device_info)
    }
}

impl HidBackend for HidApiBackend {
    fn enumerate(&mut self) -> HidCommonResult<Vec<HidDeviceInfo>> {
        self.api
            .refresh_devices()
            .map_err(|e| HidCommonError::Backend(e.to_string()))?;
        let devices: Vec<HidDeviceInfo> = self.api.device_list().map(to_device_info).collect();
        debug!("Enumerated {} HID interfaces", devices.len());
        Ok(devices)
    }

    fn open_path(&mut self, path: &str) -> HidCommonResult<Box<dyn HidDevice>> {
        let c_path = CString::new(path)
            .map_err(|e| HidCommonError::OpenError(format!("{path}: {e}")))?;
        let device = self
            .api
            .open_path(&c_path)
            .map_err(|e| HidCommonError::OpenError(format!("{path}: {e}")))?;
        let info = self
            .lookup(path)
            .unwrap_or_else(|| HidDeviceInfo::new(0, 0, path));
        debug!("Opened HID interface {} ({})", path, info.display_name());
        Ok(Box::new(HidApiDevice {
            device: Some(device),
            info,
        }))
    }
}

fn to_device_info(d: &DeviceInfo) -> HidDeviceInfo {
    HidDeviceInfo {
        vendor_id: d.vendor_id(),
        product_id: d.product_id(),
        serial_number: d.serial_number().map(str::to_string),
        manufacturer: d.manufacturer_string().map(str::to_string),
        product_name: d.product_string().map(str::to_string),
        path: d.path().to_string_lossy().to_string(),
        interface_number: d.interface_number(),
        usage_page: d.usage_page(),
        usage: d.usage(),
    }
}

/// An open `hidapi` handle. The handle is released when closed or dropped.
struct HidApiDevice {
    device: Option<hidapi::HidDevice>,
    info: HidDeviceInfo,
}

impl HidApiDevice {
    fn handle(&self) -> HidCommonResult<&hidapi::HidDevice> {
        self.device.as_ref().ok_or(HidCommonError::Disconnected)
    }
}

impl HidDevice for HidApiDevice {
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        let written = self
            .handle()?
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))?;
        if written != data.len() {
            warn!("Partial HID write: {} of {} bytes", written, data.len());
        }
        Ok(written)
    }

    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        self.handle()?
            .send_feature_report(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))?;
        Ok(data.len())
    }

    fn device_info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) -> HidCommonResult<()> {
        if self.device.take().is_some() {
            debug!("Closed HID interface {}", self.info.path);
        }
        Ok(())
    }
}
