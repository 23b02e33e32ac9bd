//! Error types for configuration, transport and control.

use std::path::PathBuf;

use thiserror::Error;
use vsl_hid_common::HidCommonError;
use vsl_hid_protocol::ParameterError;

/// Failures at the HID boundary. Nothing here is retried.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("No HID interface matches {vendor_id:04x}:{product_id:04x}{}", interface_suffix(.interface_number))]
    DeviceNotFound {
        vendor_id: u16,
        product_id: u16,
        interface_number: Option<i32>,
    },

    #[error("Failed to open {path}")]
    DeviceOpenFailure {
        path: String,
        #[source]
        source: HidCommonError,
    },

    #[error("Write to {path} failed")]
    WriteFailure {
        path: String,
        #[source]
        source: HidCommonError,
    },

    #[error("Transport is not open")]
    NotOpen,

    #[error("HID enumeration failed")]
    Backend(#[source] HidCommonError),
}

fn interface_suffix(interface_number: &Option<i32>) -> String {
    interface_number
        .map(|n| format!(" on interface {n}"))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Parameter '{name}' is invalid")]
    Parameter {
        name: String,
        #[source]
        source: ParameterError,
    },
}

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
