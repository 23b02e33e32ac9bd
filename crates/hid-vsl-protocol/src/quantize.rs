//! DSP float to wire integer conversion.
//!
//! The firmware's fixed-point scale has not been confirmed on hardware. Two
//! candidate models are recovered from the vendor library and both are
//! selectable; there is deliberately no default.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterDescriptor;

/// How a DSP float is scaled into the integer range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScaleModel {
    /// The float domain spans `0..=max_float`, mapped onto
    /// `0..=max_encoded_int`. Factor = `max_encoded_int / max_float`.
    FullScale { max_float: f32 },
    /// A fixed multiplier independent of the descriptor.
    Multiplier { factor: f32 },
}

impl ScaleModel {
    /// The 0 to 1000 float domain hypothesis.
    pub const DSP_FULL_SCALE: Self = Self::FullScale { max_float: 1000.0 };

    /// The fixed 65.535 multiplier hypothesis.
    pub const CAPTURED_MULTIPLIER: Self = Self::Multiplier { factor: 65.535 };

    /// Scale factor for a parameter whose integer range tops out at
    /// `max_encoded_int`. `None` for a zero, negative or non-finite factor.
    pub fn factor(&self, max_encoded_int: u16) -> Option<f32> {
        let factor = match *self {
            Self::FullScale { max_float } => f32::from(max_encoded_int) / max_float,
            Self::Multiplier { factor } => factor,
        };
        (factor.is_finite() && factor > 0.0).then_some(factor)
    }
}

impl std::fmt::Display for ScaleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullScale { max_float } => write!(f, "full-scale (0..{max_float})"),
            Self::Multiplier { factor } => write!(f, "multiplier (x{factor})"),
        }
    }
}

/// Converts DSP floats into `[0, max_encoded_int]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    scale: ScaleModel,
}

impl Quantizer {
    pub fn new(scale: ScaleModel) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> ScaleModel {
        self.scale
    }

    /// Scale, round to nearest, clamp into `[0, max_encoded_int]`.
    ///
    /// Never fails: out-of-range values saturate, and NaN, a zero
    /// `max_encoded_int` or a degenerate scale factor all yield `0`.
    pub fn quantize(&self, dsp_value: f32, descriptor: &ParameterDescriptor) -> u16 {
        let max = descriptor.max_encoded_int();
        if max == 0 {
            return 0;
        }
        let Some(factor) = self.scale.factor(max) else {
            return 0;
        };

        let scaled = (dsp_value * factor).round();
        if scaled.is_nan() {
            return 0;
        }
        saturating_u16(scaled.clamp(0.0, f32::from(max)))
    }

    /// Inverse scaling of [`Quantizer::quantize`], without the rounding.
    /// Returns `0.0` when the scale factor is degenerate.
    pub fn dequantize(&self, encoded: u16, descriptor: &ParameterDescriptor) -> f32 {
        self.scale
            .factor(descriptor.max_encoded_int())
            .map_or(0.0, |factor| f32::from(encoded) / factor)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers clamp into [0, u16::MAX] first"
)]
fn saturating_u16(value: f32) -> u16 {
    value as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::audiobox_gain_ch1;
    use approx::assert_relative_eq;

    #[test]
    fn test_full_scale_reference_value() {
        let q = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let d = audiobox_gain_ch1();
        assert_eq!(q.quantize(622.455, &d), 40793);
    }

    #[test]
    fn test_multiplier_matches_full_scale_at_16_bits() {
        let full = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let mult = Quantizer::new(ScaleModel::CAPTURED_MULTIPLIER);
        let d = audiobox_gain_ch1();
        for v in [0.0_f32, 1.0, 250.0, 622.455, 999.0] {
            assert_eq!(full.quantize(v, &d), mult.quantize(v, &d));
        }
    }

    #[test]
    fn test_quantize_clamps() {
        let q = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let d = audiobox_gain_ch1();
        assert_eq!(q.quantize(-5.0, &d), 0);
        assert_eq!(q.quantize(1_000_000.0, &d), 65535);
        assert_eq!(q.quantize(f32::INFINITY, &d), 65535);
        assert_eq!(q.quantize(f32::NEG_INFINITY, &d), 0);
        assert_eq!(q.quantize(f32::NAN, &d), 0);
    }

    #[test]
    fn test_quantize_respects_smaller_max() {
        let q = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let d = audiobox_gain_ch1().with_max_encoded_int(1000);
        assert_eq!(q.quantize(500.0, &d), 500);
        assert_eq!(q.quantize(5000.0, &d), 1000);
    }

    #[test]
    fn test_quantize_zero_max_is_zero() {
        let q = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let d = audiobox_gain_ch1().with_max_encoded_int(0);
        assert_eq!(q.quantize(622.455, &d), 0);
    }

    #[test]
    fn test_degenerate_scale_is_zero() {
        let d = audiobox_gain_ch1();
        for scale in [
            ScaleModel::FullScale { max_float: 0.0 },
            ScaleModel::Multiplier { factor: -1.0 },
            ScaleModel::Multiplier { factor: f32::NAN },
        ] {
            let q = Quantizer::new(scale);
            assert_eq!(q.quantize(500.0, &d), 0);
            assert_relative_eq!(q.dequantize(500, &d), 0.0);
        }
    }

    #[test]
    fn test_dequantize_inverts_scale() {
        let q = Quantizer::new(ScaleModel::DSP_FULL_SCALE);
        let d = audiobox_gain_ch1();
        assert_relative_eq!(q.dequantize(40793, &d), 622.461, epsilon = 0.01);
        assert_relative_eq!(q.dequantize(65535, &d), 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_scale_serde_tagged() -> Result<(), Box<dyn std::error::Error>> {
        let scale: ScaleModel = serde_json::from_str(r#"{"type":"multiplier","factor":65.535}"#)?;
        assert_eq!(scale, ScaleModel::CAPTURED_MULTIPLIER);
        let json = serde_json::to_string(&ScaleModel::DSP_FULL_SCALE)?;
        assert_eq!(json, r#"{"type":"full_scale","max_float":1000.0}"#);
        Ok(())
    }
}
