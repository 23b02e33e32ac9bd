//! Scoped HID connection to one VSL interface.
//!
//! A [`VslTransport`] owns at most one open device handle. The handle is
//! acquired by [`VslTransport::open`] and released by
//! [`VslTransport::close`] or on drop, so every exit path gives it back.
//! All calls are synchronous; there is no timeout and no retry.

use tracing::{debug, info, warn};
use vsl_hid_common::{HidBackend, HidDevice, HidDeviceInfo};

use crate::config::DeviceIdentity;
use crate::error::TransportError;

pub struct VslTransport<B: HidBackend> {
    backend: B,
    identity: DeviceIdentity,
    device: Option<Box<dyn HidDevice>>,
}

impl<B: HidBackend> VslTransport<B> {
    pub fn new(backend: B, identity: DeviceIdentity) -> Self {
        Self {
            backend,
            identity,
            device: None,
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Info of the open interface, if any.
    pub fn device_info(&self) -> Option<&HidDeviceInfo> {
        self.device.as_deref().map(|d| d.device_info())
    }

    /// Interfaces that match the identity, ordered by interface number.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Backend`] if enumeration fails.
    pub fn candidates(&mut self) -> Result<Vec<HidDeviceInfo>, TransportError> {
        let mut matching: Vec<HidDeviceInfo> = self
            .backend
            .enumerate()
            .map_err(TransportError::Backend)?
            .into_iter()
            .filter(|info| self.identity.matches(info))
            .collect();
        matching.sort_by_key(|info| info.interface_number);
        Ok(matching)
    }

    /// Find the device and open it. A no-op when already open.
    ///
    /// With several matching interfaces the configured `interface_number`
    /// wins; without one the lowest interface number is used.
    ///
    /// # Errors
    ///
    /// - [`TransportError::DeviceNotFound`] when nothing matches.
    /// - [`TransportError::DeviceOpenFailure`] when the OS refuses the open.
    /// - [`TransportError::Backend`] when enumeration fails.
    pub fn open(&mut self) -> Result<(), TransportError> {
        if self.device.is_some() {
            debug!("Transport already open");
            return Ok(());
        }

        let candidates = self.candidates()?;
        for info in &candidates {
            debug!(
                "Candidate {} interface {} usage {:04x}:{:04x} at {}",
                info.display_name(),
                info.interface_number,
                info.usage_page,
                info.usage,
                info.path
            );
        }

        let Some(selected) = candidates.first() else {
            return Err(TransportError::DeviceNotFound {
                vendor_id: self.identity.vendor_id,
                product_id: self.identity.product_id,
                interface_number: self.identity.interface_number,
            });
        };

        let device = self.backend.open_path(&selected.path).map_err(|source| {
            TransportError::DeviceOpenFailure {
                path: selected.path.clone(),
                source,
            }
        })?;
        info!(
            "Opened {} interface {} at {}",
            selected.display_name(),
            selected.interface_number,
            selected.path
        );
        self.device = Some(device);
        Ok(())
    }

    /// Write one report through the configured report kind.
    ///
    /// # Errors
    ///
    /// - [`TransportError::NotOpen`] before [`VslTransport::open`].
    /// - [`TransportError::WriteFailure`] when the write fails. Not retried.
    pub fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let kind = self.identity.report_kind;
        let device = self.device.as_mut().ok_or(TransportError::NotOpen)?;
        match device.send(kind, data) {
            Ok(written) => {
                if written < data.len() {
                    warn!("Short write: {} of {} bytes", written, data.len());
                }
                debug!("Sent {:?} report of {} bytes", kind, written);
                Ok(written)
            }
            Err(source) => {
                let path = device.device_info().path.clone();
                warn!("Write to {} failed: {}", path, source);
                Err(TransportError::WriteFailure { path, source })
            }
        }
    }

    /// Release the handle. Safe to call when already closed.
    pub fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            let path = device.device_info().path.clone();
            if let Err(e) = device.close() {
                warn!("Error closing {}: {}", path, e);
            }
            info!("Closed {}", path);
        }
    }
}

impl<B: HidBackend> Drop for VslTransport<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: HidBackend> std::fmt::Debug for VslTransport<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VslTransport")
            .field("identity", &self.identity)
            .field("open", &self.device_info().map(|d| d.path.as_str()))
            .finish()
    }
}
