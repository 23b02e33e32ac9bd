//! DSP parameter descriptors.
//!
//! A [`ParameterDescriptor`] carries the curve coefficients and limits for one
//! DSP control. Descriptors are immutable once built: construct them with the
//! consuming builder or deserialize them from config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec;
use crate::ids::parameter_ids;

/// Default upper bound of the encoded integer (16-bit unsigned).
pub const DEFAULT_MAX_ENCODED_INT: u16 = u16::MAX;

/// Descriptor validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Parameter 0x{id:04X}: max_encoded_int must be non-zero")]
    ZeroMaxEncoded { id: u16 },

    #[error("Parameter 0x{id:04X}: curve map is inverted ({min} > {max})")]
    InvertedCurveMap { id: u16, min: f32, max: f32 },

    #[error("Parameter 0x{id:04X}: {field} is not finite")]
    NonFinite { id: u16, field: &'static str },

    #[error("Parameter 0x{id:04X}: invalid frequency range {min} Hz .. {max} Hz")]
    InvalidFrequencyRange { id: u16, min: f32, max: f32 },

    #[error("Parameter 0x{id:04X}: gain curve needs a non-degenerate curve map")]
    DegenerateGainCurve { id: u16 },

    #[error("Parameter 0x{id:04X}: gain curve needs a non-zero {field}")]
    ZeroGainCoefficient { id: u16, field: &'static str },
}

/// Coefficients and limits for one DSP parameter.
///
/// Gain parameters use `offset_a`, `coeff_c1`, `log_factor` and the curve
/// map. Frequency parameters use `freq_min_hz` and `freq_max_hz`. Unused
/// fields stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    id: u16,
    #[serde(default = "default_max_encoded_int")]
    max_encoded_int: u16,
    #[serde(default)]
    offset_a: f32,
    #[serde(default)]
    coeff_c1: f32,
    #[serde(default)]
    log_factor: f32,
    #[serde(default)]
    curve_min_map: f32,
    #[serde(default = "default_curve_max_map")]
    curve_max_map: f32,
    #[serde(default)]
    freq_min_hz: f32,
    #[serde(default)]
    freq_max_hz: f32,
}

fn default_max_encoded_int() -> u16 {
    DEFAULT_MAX_ENCODED_INT
}

fn default_curve_max_map() -> f32 {
    1.0
}

impl ParameterDescriptor {
    /// A descriptor with every coefficient zeroed, a `[0, 1]` curve map and
    /// the default 16-bit encoded range.
    pub fn new(id: u16) -> Self {
        Self {
            id,
            max_encoded_int: DEFAULT_MAX_ENCODED_INT,
            offset_a: 0.0,
            coeff_c1: 0.0,
            log_factor: 0.0,
            curve_min_map: 0.0,
            curve_max_map: 1.0,
            freq_min_hz: 0.0,
            freq_max_hz: 0.0,
        }
    }

    /// Set the exponential gain curve `offset_a + coeff_c1 * exp(t * log_factor)`.
    pub fn with_gain_curve(mut self, offset_a: f32, coeff_c1: f32, log_factor: f32) -> Self {
        self.offset_a = offset_a;
        self.coeff_c1 = coeff_c1;
        self.log_factor = log_factor;
        self
    }

    pub fn with_curve_map(mut self, min: f32, max: f32) -> Self {
        self.curve_min_map = min;
        self.curve_max_map = max;
        self
    }

    pub fn with_frequency_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.freq_min_hz = min_hz;
        self.freq_max_hz = max_hz;
        self
    }

    pub fn with_max_encoded_int(mut self, max: u16) -> Self {
        self.max_encoded_int = max;
        self
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn max_encoded_int(&self) -> u16 {
        self.max_encoded_int
    }

    pub fn offset_a(&self) -> f32 {
        self.offset_a
    }

    pub fn coeff_c1(&self) -> f32 {
        self.coeff_c1
    }

    pub fn log_factor(&self) -> f32 {
        self.log_factor
    }

    pub fn curve_min_map(&self) -> f32 {
        self.curve_min_map
    }

    pub fn curve_max_map(&self) -> f32 {
        self.curve_max_map
    }

    pub fn freq_min_hz(&self) -> f32 {
        self.freq_min_hz
    }

    pub fn freq_max_hz(&self) -> f32 {
        self.freq_max_hz
    }

    /// `curve_max_map - curve_min_map`.
    pub fn curve_range(&self) -> f32 {
        self.curve_max_map - self.curve_min_map
    }

    /// Check the descriptor for values the device can never accept.
    ///
    /// The codec functions stay total without this; validation exists so
    /// that config mistakes surface at load time instead of as silently
    /// clamped output.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] found.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let id = self.id;
        if self.max_encoded_int == 0 {
            return Err(ParameterError::ZeroMaxEncoded { id });
        }

        let fields = [
            ("offset_a", self.offset_a),
            ("coeff_c1", self.coeff_c1),
            ("log_factor", self.log_factor),
            ("curve_min_map", self.curve_min_map),
            ("curve_max_map", self.curve_max_map),
            ("freq_min_hz", self.freq_min_hz),
            ("freq_max_hz", self.freq_max_hz),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ParameterError::NonFinite { id, field });
        }

        if self.curve_max_map < self.curve_min_map {
            return Err(ParameterError::InvertedCurveMap {
                id,
                min: self.curve_min_map,
                max: self.curve_max_map,
            });
        }

        if self.freq_max_hz > 0.0 && !self.has_frequency_range() {
            return Err(ParameterError::InvalidFrequencyRange {
                id,
                min: self.freq_min_hz,
                max: self.freq_max_hz,
            });
        }

        Ok(())
    }

    fn has_frequency_range(&self) -> bool {
        self.freq_min_hz > 0.0 && self.freq_max_hz > self.freq_min_hz
    }
}

/// Which curve a named control runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Exponential gain curve, see [`codec::encode_gain`].
    Gain,
    /// Logarithmic frequency curve, see [`codec::map_frequency`].
    Frequency,
}

impl ParameterKind {
    /// Linear position to DSP float.
    pub fn encode(self, linear: f32, descriptor: &ParameterDescriptor) -> f32 {
        match self {
            Self::Gain => codec::encode_gain(linear, descriptor),
            Self::Frequency => codec::map_frequency(linear, descriptor),
        }
    }

    /// DSP float back to a linear position.
    pub fn decode(self, dsp_value: f32, descriptor: &ParameterDescriptor) -> f32 {
        match self {
            Self::Gain => codec::decode_gain(dsp_value, descriptor),
            Self::Frequency => codec::decode_frequency(dsp_value, descriptor),
        }
    }

    /// Display unit of the DSP value, if it has one.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::Gain => None,
            Self::Frequency => Some("Hz"),
        }
    }

    /// [`ParameterDescriptor::validate`] plus the requirements of this curve.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] when the descriptor cannot drive this kind.
    pub fn validate(self, descriptor: &ParameterDescriptor) -> Result<(), ParameterError> {
        descriptor.validate()?;
        let id = descriptor.id();
        match self {
            Self::Gain if descriptor.curve_range() <= f32::EPSILON => {
                Err(ParameterError::DegenerateGainCurve { id })
            }
            // Either coefficient at zero flattens the curve to a constant.
            Self::Gain if descriptor.coeff_c1().abs() <= f32::EPSILON => {
                Err(ParameterError::ZeroGainCoefficient {
                    id,
                    field: "coeff_c1",
                })
            }
            Self::Gain if descriptor.log_factor().abs() <= f32::EPSILON => {
                Err(ParameterError::ZeroGainCoefficient {
                    id,
                    field: "log_factor",
                })
            }
            Self::Frequency if !descriptor.has_frequency_range() => {
                Err(ParameterError::InvalidFrequencyRange {
                    id,
                    min: descriptor.freq_min_hz(),
                    max: descriptor.freq_max_hz(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gain => write!(f, "gain"),
            Self::Frequency => write!(f, "frequency"),
        }
    }
}

/// Channel 1 input gain as recovered from the vendor library (test coefficients).
pub fn audiobox_gain_ch1() -> ParameterDescriptor {
    ParameterDescriptor::new(parameter_ids::GAIN_CH1).with_gain_curve(-10.0, 20.0, 4.60517)
}

/// Channel 1 high-pass filter corner, 20 Hz to 20 kHz.
pub fn audiobox_hpf_ch1() -> ParameterDescriptor {
    ParameterDescriptor::new(parameter_ids::HPF_FREQ_CH1)
        .with_curve_map(0.0, 0.0)
        .with_frequency_range(20.0, 20_000.0)
}
