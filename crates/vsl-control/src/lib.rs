//! Config-driven DSP parameter control for AudioBox VSL interfaces.
//!
//! - [`config`]: device identity, wire format and parameter table.
//! - [`transport`]: the scoped HID connection.
//! - [`surface`]: named parameters to reports to writes.
//! - [`mixer`]: the read/write capability a mixer host consumes.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod mixer;
pub mod surface;
pub mod transport;

pub use config::{DeviceIdentity, ParameterEntry, VslConfig, WireConfig};
pub use error::{ConfigError, ControlError, TransportError};
pub use mixer::MixerControl;
pub use surface::{ControlSurface, ParameterWrite, encode_position};
pub use transport::VslTransport;
