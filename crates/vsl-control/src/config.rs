//! Device configuration.
//!
//! One file describes a device: its USB identity, the wire format (byte
//! layout and scale model, both required) and the table of named
//! parameters. YAML and JSON are accepted; the format is picked from the
//! file extension.
//!
//! ```yaml
//! device:
//!   vendor_id: 0x194f
//!   product_id: 0x0101
//!   report_id: 0x06
//! wire:
//!   layout: { type: compact }
//!   scale: { type: full_scale, max_float: 1000.0 }
//! parameters:
//!   - { name: gain_ch1, kind: gain, id: 0x1A01, offset_a: -10.0, coeff_c1: 20.0, log_factor: 4.60517 }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vsl_hid_common::{HidDeviceInfo, ReportKind};
use vsl_hid_protocol::{
    PacketEncoder, PacketLayout, ParameterDescriptor, ParameterKind, Quantizer, ScaleModel,
    VSL_VENDOR_ID, product_ids, report_ids,
};

use crate::error::ConfigError;

/// Which USB interface to talk to and how reports are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub report_id: u8,
    /// Restrict selection to one interface of a composite device.
    #[serde(default)]
    pub interface_number: Option<i32>,
    #[serde(default)]
    pub report_kind: ReportKind,
}

impl DeviceIdentity {
    /// AudioBox 22 VSL with the best-guess report ID.
    pub fn audiobox_22_vsl() -> Self {
        Self {
            vendor_id: VSL_VENDOR_ID,
            product_id: product_ids::AUDIOBOX_22_VSL,
            report_id: report_ids::DSP_CONTROL,
            interface_number: None,
            report_kind: ReportKind::Output,
        }
    }

    /// VID/PID match, plus the interface number when one is configured.
    pub fn matches(&self, info: &HidDeviceInfo) -> bool {
        info.matches(self.vendor_id, self.product_id)
            && self
                .interface_number
                .is_none_or(|n| info.interface_number == n)
    }
}

/// Wire format. Both halves are unconfirmed on hardware and must be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireConfig {
    pub layout: PacketLayout,
    pub scale: ScaleModel,
}

/// One named control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(flatten)]
    pub descriptor: ParameterDescriptor,
    /// Keys the descriptor did not claim; rejected by [`VslConfig::validate`].
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
}

impl ParameterEntry {
    pub fn new(
        name: impl Into<String>,
        kind: ParameterKind,
        descriptor: ParameterDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            descriptor,
            unknown: BTreeMap::new(),
        }
    }
}

/// A complete device description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VslConfig {
    pub device: DeviceIdentity,
    pub wire: WireConfig,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
}

impl VslConfig {
    /// Load and validate a config file. `.json` files are parsed as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        debug!(
            "Loaded {} parameters from {}",
            config.parameters.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a parse or validation failure.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a parse or validation failure.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check names and IDs are unique, no entry carries unknown keys and
    /// every descriptor fits its kind.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wire.scale.factor(u16::MAX).is_none() {
            return Err(ConfigError::Invalid(format!(
                "wire.scale {} has no usable factor",
                self.wire.scale
            )));
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for entry in &self.parameters {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "parameter name must not be empty".to_string(),
                ));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate parameter name '{}'",
                    entry.name
                )));
            }
            if !ids.insert(entry.descriptor.id()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate parameter id 0x{:04X} ('{}')",
                    entry.descriptor.id(),
                    entry.name
                )));
            }
            if !entry.unknown.is_empty() {
                let keys: Vec<&str> = entry.unknown.keys().map(String::as_str).collect();
                return Err(ConfigError::Invalid(format!(
                    "parameter '{}' has unknown field(s): {}",
                    entry.name,
                    keys.join(", ")
                )));
            }
            entry
                .kind
                .validate(&entry.descriptor)
                .map_err(|source| ConfigError::Parameter {
                    name: entry.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterEntry> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_by_id(&self, id: u16) -> Option<&ParameterEntry> {
        self.parameters.iter().find(|p| p.descriptor.id() == id)
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.wire.scale)
    }

    pub fn encoder(&self) -> PacketEncoder {
        PacketEncoder::new(self.device.report_id, self.wire.layout, self.quantizer())
    }
}
