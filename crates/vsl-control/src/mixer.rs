//! Mixer-style access to DSP parameters.
//!
//! This is the capability a host mixer framework needs from the device: read
//! the current value of a named channel and write a new one. Registering it
//! with a particular framework is up to the embedding application.

use vsl_hid_common::HidBackend;

use crate::error::ControlError;
use crate::surface::ControlSurface;

pub trait MixerControl {
    /// Current position of `channel` in `[0, 1]`, if known.
    fn read(&self, channel: &str) -> Option<f32>;

    /// Set `channel` to `value` (a `[0, 1]` position).
    ///
    /// # Errors
    ///
    /// Returns [`ControlError`] if the channel is unknown or the write fails.
    fn write(&mut self, channel: &str, value: f32) -> Result<(), ControlError>;

    /// Names of every channel this control exposes.
    fn channels(&self) -> Vec<String>;
}

impl<B: HidBackend> MixerControl for ControlSurface<B> {
    fn read(&self, channel: &str) -> Option<f32> {
        self.last_position(channel)
    }

    fn write(&mut self, channel: &str, value: f32) -> Result<(), ControlError> {
        self.set_position(channel, value).map(|_| ())
    }

    fn channels(&self) -> Vec<String> {
        self.parameters().iter().map(|p| p.name.clone()).collect()
    }
}
