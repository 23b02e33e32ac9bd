//! HID transport traits
//!
//! Every call here is synchronous and blocking. There is no timeout and no
//! retry at this layer; a failed write is surfaced once to the caller.

use crate::{HidCommonError, HidCommonResult, HidDeviceInfo};
use serde::{Deserialize, Serialize};

/// How a control report travels to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Interrupt OUT / `hid_write`.
    #[default]
    Output,
    /// Control transfer SET_REPORT(Feature) / `hid_send_feature_report`.
    Feature,
}

/// An open HID interface.
pub trait HidDevice {
    /// Write an output report. The first byte is the report ID.
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    /// Send a feature report. The first byte is the report ID.
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    fn device_info(&self) -> &HidDeviceInfo;

    fn is_connected(&self) -> bool;

    fn close(&mut self) -> HidCommonResult<()>;

    /// Dispatch on [`ReportKind`].
    fn send(&mut self, kind: ReportKind, data: &[u8]) -> HidCommonResult<usize> {
        match kind {
            ReportKind::Output => self.write_report(data),
            ReportKind::Feature => self.send_feature_report(data),
        }
    }
}

/// Enumerates HID interfaces and opens them by OS path.
pub trait HidBackend {
    fn enumerate(&mut self) -> HidCommonResult<Vec<HidDeviceInfo>>;

    fn open_path(&mut self, path: &str) -> HidCommonResult<Box<dyn HidDevice>>;
}

impl<B: HidBackend + ?Sized> HidBackend for Box<B> {
    fn enumerate(&mut self) -> HidCommonResult<Vec<HidDeviceInfo>> {
        (**self).enumerate()
    }

    fn open_path(&mut self, path: &str) -> HidCommonResult<Box<dyn HidDevice>> {
        (**self).open_path(path)
    }
}

pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory HID interface that records every report written to it.
    ///
    /// Clones share state, so a test can keep one handle while the code
    /// under test owns another.
    #[derive(Clone)]
    pub struct MockHidDevice {
        info: HidDeviceInfo,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        feature_history: Arc<Mutex<Vec<Vec<u8>>>>,
        connected: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
        open_count: Arc<AtomicUsize>,
        close_count: Arc<AtomicUsize>,
    }

    impl MockHidDevice {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self::from_info(HidDeviceInfo::new(vendor_id, product_id, path))
        }

        pub fn from_info(info: HidDeviceInfo) -> Self {
            Self {
                info,
                write_history: Arc::new(Mutex::new(Vec::new())),
                feature_history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(AtomicBool::new(true)),
                fail_writes: Arc::new(AtomicBool::new(false)),
                open_count: Arc::new(AtomicUsize::new(0)),
                close_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn info(&self) -> &HidDeviceInfo {
            &self.info
        }

        pub fn get_write_history(&self) -> Vec<Vec<u8>> {
            let history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn get_feature_history(&self) -> Vec<Vec<u8>> {
            let history = self
                .feature_history
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        /// Make every subsequent write fail with [`HidCommonError::WriteError`].
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn disconnect(&self) {
            self.connected.store(false, Ordering::SeqCst);
        }

        pub fn reconnect(&self) {
            self.connected.store(true, Ordering::SeqCst);
        }

        /// Number of times this interface was opened through [`MockHidBackend`].
        pub fn open_count(&self) -> usize {
            self.open_count.load(Ordering::SeqCst)
        }

        pub fn close_count(&self) -> usize {
            self.close_count.load(Ordering::SeqCst)
        }

        fn record(&self, history: &Mutex<Vec<Vec<u8>>>, data: &[u8]) -> HidCommonResult<usize> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(HidCommonError::Disconnected);
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(HidCommonError::WriteError(
                    "injected write failure".to_string(),
                ));
            }
            let mut history = history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(data.len())
        }
    }

    impl HidDevice for MockHidDevice {
        fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            let history = Arc::clone(&self.write_history);
            self.record(&history, data)
        }

        fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            let history = Arc::clone(&self.feature_history);
            self.record(&history, data)
        }

        fn device_info(&self) -> &HidDeviceInfo {
            &self.info
        }

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        fn close(&mut self) -> HidCommonResult<()> {
            self.close_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Backend over a fixed set of [`MockHidDevice`]s.
    #[derive(Default)]
    pub struct MockHidBackend {
        devices: Vec<MockHidDevice>,
        fail_enumerate: bool,
        fail_open: bool,
    }

    impl MockHidBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_device(&mut self, device: MockHidDevice) {
            self.devices.push(device);
        }

        pub fn with_device(mut self, device: MockHidDevice) -> Self {
            self.add_device(device);
            self
        }

        pub fn device_count(&self) -> usize {
            self.devices.len()
        }

        pub fn set_fail_enumerate(&mut self, fail: bool) {
            self.fail_enumerate = fail;
        }

        pub fn set_fail_open(&mut self, fail: bool) {
            self.fail_open = fail;
        }
    }

    impl HidBackend for MockHidBackend {
        fn enumerate(&mut self) -> HidCommonResult<Vec<HidDeviceInfo>> {
            if self.fail_enumerate {
                return Err(HidCommonError::Backend("enumeration failed".to_string()));
            }
            Ok(self.devices.iter().map(|d| d.info.clone()).collect())
        }

        fn open_path(&mut self, path: &str) -> HidCommonResult<Box<dyn HidDevice>> {
            if self.fail_open {
                return Err(HidCommonError::OpenError(format!(
                    "{path}: permission denied"
                )));
            }
            let device = self
                .devices
                .iter()
                .find(|d| d.info.path == path)
                .ok_or_else(|| HidCommonError::DeviceNotFound(path.to_string()))?;
            device.open_count.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(device.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockHidBackend, MockHidDevice};
    use super::*;

    #[test]
    fn test_mock_device_basic() {
        let device = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0");

        assert_eq!(device.device_info().vendor_id, 0x194F);
        assert_eq!(device.device_info().product_id, 0x0101);
        assert!(device.is_connected());
    }

    #[test]
    fn test_mock_device_write() -> Result<(), HidCommonError> {
        let mut device = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0");

        let written = device.write_report(&[0x06, 0x01, 0x1A])?;
        assert_eq!(written, 3);

        let history = device.get_write_history();
        assert_eq!(history, vec![vec![0x06, 0x01, 0x1A]]);
        assert!(device.get_feature_history().is_empty());
        Ok(())
    }

    #[test]
    fn test_send_dispatches_on_report_kind() -> Result<(), HidCommonError> {
        let mut device = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0");

        device.send(ReportKind::Output, &[0x06, 0xAA])?;
        device.send(ReportKind::Feature, &[0x06, 0xBB])?;

        assert_eq!(device.get_write_history(), vec![vec![0x06, 0xAA]]);
        assert_eq!(device.get_feature_history(), vec![vec![0x06, 0xBB]]);
        Ok(())
    }

    #[test]
    fn test_mock_device_disconnect() {
        let mut device = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0");

        device.disconnect();

        assert!(!device.is_connected());
        let result = device.write_report(&[0x01]);
        assert!(matches!(result, Err(HidCommonError::Disconnected)));
    }

    #[test]
    fn test_mock_device_injected_write_failure() {
        let mut device = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0");
        device.set_fail_writes(true);

        let result = device.write_report(&[0x06]);
        assert!(matches!(result, Err(HidCommonError::WriteError(_))));
        assert!(device.get_write_history().is_empty());
    }

    #[test]
    fn test_mock_backend_opens_by_path() -> Result<(), HidCommonError> {
        let control = MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw1");
        let mut backend = MockHidBackend::new()
            .with_device(MockHidDevice::new(0x194F, 0x0101, "/dev/hidraw0"))
            .with_device(control.clone());

        assert_eq!(backend.device_count(), 2);
        assert_eq!(backend.enumerate()?.len(), 2);

        let mut handle = backend.open_path("/dev/hidraw1")?;
        handle.write_report(&[0x06, 0x00])?;

        assert_eq!(control.open_count(), 1);
        assert_eq!(control.get_write_history().len(), 1);
        Ok(())
    }

    #[test]
    fn test_mock_backend_unknown_path() {
        let mut backend = MockHidBackend::new();
        let result = backend.open_path("/dev/hidraw9");
        assert!(matches!(result, Err(HidCommonError::DeviceNotFound(_))));
    }

    #[test]
    fn test_report_kind_serde() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&ReportKind::Feature)?, "\"feature\"");
        let kind: ReportKind = serde_json::from_str("\"output\"")?;
        assert_eq!(kind, ReportKind::Output);
        Ok(())
    }
}
