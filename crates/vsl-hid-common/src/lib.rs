//! Common HID plumbing for VSL DSP control
//!
//! This crate owns the boundary between the I/O-free protocol code and the
//! operating system's HID stack: device descriptions, the synchronous
//! transport traits, a `hidapi`-backed implementation, an in-memory mock and
//! a cursor for reading captured reports.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hid_traits;
pub mod hidapi_backend;
pub mod report_parser;

pub use device_info::*;
pub use hid_traits::*;
pub use hidapi_backend::HidApiBackend;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("HID backend error: {0}")]
    Backend(String),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = HidCommonError::DeviceNotFound("/dev/hidraw3".to_string());
        assert_eq!(format!("{err}"), "Device not found: /dev/hidraw3");

        let err = HidCommonError::Disconnected;
        assert_eq!(format!("{err}"), "Device disconnected");

        let err = HidCommonError::Backend("hid_init failed".to_string());
        assert_eq!(format!("{err}"), "HID backend error: hid_init failed");
    }
}
