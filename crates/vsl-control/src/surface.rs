//! Named-parameter control on top of the transport.

use std::collections::HashMap;

use tracing::debug;
use vsl_hid_common::HidBackend;
use vsl_hid_protocol::{DspReport, PacketEncoder, clamp_position};

use crate::config::{ParameterEntry, VslConfig};
use crate::error::ControlError;
use crate::transport::VslTransport;

/// Result of encoding one position for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterWrite {
    /// The position after clamping into `[0, 1]`.
    pub position: f32,
    /// DSP-domain value from the parameter's curve.
    pub dsp_value: f32,
    pub report: DspReport,
}

/// Run `linear` through the entry's curve, quantizer and report layout.
pub fn encode_position(
    encoder: &PacketEncoder,
    entry: &ParameterEntry,
    linear: f32,
) -> ParameterWrite {
    let position = clamp_position(linear);
    let dsp_value = entry.kind.encode(position, &entry.descriptor);
    let report = encoder.build_packet(entry.descriptor.id(), dsp_value, &entry.descriptor);
    ParameterWrite {
        position,
        dsp_value,
        report,
    }
}

/// A device's parameter table bound to a transport and an encoder.
///
/// Positions written this session are remembered in memory so a caller can
/// read them back; nothing is persisted.
pub struct ControlSurface<B: HidBackend> {
    transport: VslTransport<B>,
    encoder: PacketEncoder,
    parameters: Vec<ParameterEntry>,
    positions: HashMap<String, f32>,
}

impl<B: HidBackend> ControlSurface<B> {
    pub fn new(
        transport: VslTransport<B>,
        encoder: PacketEncoder,
        parameters: Vec<ParameterEntry>,
    ) -> Self {
        Self {
            transport,
            encoder,
            parameters,
            positions: HashMap::new(),
        }
    }

    pub fn from_config(config: &VslConfig, backend: B) -> Self {
        Self::new(
            VslTransport::new(backend, config.device.clone()),
            config.encoder(),
            config.parameters.clone(),
        )
    }

    pub fn parameters(&self) -> &[ParameterEntry] {
        &self.parameters
    }

    /// # Errors
    ///
    /// Returns [`ControlError::UnknownParameter`] if no entry has this name.
    pub fn entry(&self, name: &str) -> Result<&ParameterEntry, ControlError> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ControlError::UnknownParameter(name.to_string()))
    }

    /// Encode `linear` for `name` without touching the device.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownParameter`] if no entry has this name.
    pub fn preview(&self, name: &str, linear: f32) -> Result<ParameterWrite, ControlError> {
        let entry = self.entry(name)?;
        Ok(encode_position(&self.encoder, entry, linear))
    }

    /// Encode `linear` for `name` and write it, opening the transport on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownParameter`] for an unknown name and
    /// [`ControlError::Transport`] if the open or the write fails. A failed
    /// write leaves the remembered position unchanged.
    pub fn set_position(&mut self, name: &str, linear: f32) -> Result<ParameterWrite, ControlError> {
        let write = self.preview(name, linear)?;
        self.transport.open()?;
        self.transport.send(write.report.as_bytes())?;
        debug!(
            "{} <- {:.4} (dsp {:.4}, raw {})",
            name,
            write.position,
            write.dsp_value,
            write.report.packet().encoded_value
        );
        self.positions.insert(name.to_string(), write.position);
        Ok(write)
    }

    /// Last position successfully written for `name` in this session.
    pub fn last_position(&self, name: &str) -> Option<f32> {
        self.positions.get(name).copied()
    }

    pub fn transport(&self) -> &VslTransport<B> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut VslTransport<B> {
        &mut self.transport
    }

    pub fn close(&mut self) {
        self.transport.close();
    }
}
