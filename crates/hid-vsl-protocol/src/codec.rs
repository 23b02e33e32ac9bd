//! Parameter curve codec.
//!
//! Converts between a normalized control position (0.0 to 1.0) and the
//! DSP-domain float for the two curve families the device uses:
//!
//! - **Gain**: `A + C1 * exp(t * L)` where `t` is the position normalized
//!   over the descriptor's curve map.
//! - **Frequency**: linear interpolation in log2 space between
//!   `freq_min_hz` and `freq_max_hz`, so equal position steps give equal
//!   frequency ratios.
//!
//! Every function is total. Degenerate descriptors and NaN inputs return a
//! documented fallback instead of an error; a NaN position never reaches
//! the output.

use crate::parameter::ParameterDescriptor;

/// Clamp a control position into `[0.0, 1.0]`. NaN becomes 0.0.
pub fn clamp_position(linear: f32) -> f32 {
    if linear.is_nan() {
        0.0
    } else {
        linear.clamp(0.0, 1.0)
    }
}

/// Both bounds must be strictly positive for the log2 mapping. NaN bounds
/// fail the comparison and count as invalid.
fn frequency_bounds(descriptor: &ParameterDescriptor) -> Option<(f32, f32)> {
    let (min, max) = (descriptor.freq_min_hz(), descriptor.freq_max_hz());
    (min > 0.0 && max > 0.0).then_some((min, max))
}

/// Position to DSP gain value.
///
/// Returns `offset_a` when the curve map range is `<= f32::EPSILON`.
pub fn encode_gain(linear_value: f32, descriptor: &ParameterDescriptor) -> f32 {
    let clamped = clamp_position(linear_value);
    let range = descriptor.curve_range();
    if range <= f32::EPSILON {
        return descriptor.offset_a();
    }

    let normalized = (clamped - descriptor.curve_min_map()) / range;
    let exp_term = (normalized * descriptor.log_factor()).exp();
    descriptor.offset_a() + descriptor.coeff_c1() * exp_term
}

/// Inverse of [`encode_gain`], used to show the device's current value on a
/// control surface.
///
/// Returns `0.0` for a degenerate curve (range, `coeff_c1` or `log_factor`
/// within `f32::EPSILON` of zero), a non-finite value, or a value on the
/// wrong side of `offset_a`. The result is clamped to `[0.0, 1.0]`.
pub fn decode_gain(dsp_value: f32, descriptor: &ParameterDescriptor) -> f32 {
    let range = descriptor.curve_range();
    let c1 = descriptor.coeff_c1();
    let log_factor = descriptor.log_factor();
    if !dsp_value.is_finite()
        || range <= f32::EPSILON
        || c1.abs() <= f32::EPSILON
        || log_factor.abs() <= f32::EPSILON
    {
        return 0.0;
    }

    let ratio = (dsp_value - descriptor.offset_a()) / c1;
    if ratio <= 0.0 {
        return 0.0;
    }

    let normalized = ratio.ln() / log_factor;
    clamp_position(descriptor.curve_min_map() + range * normalized)
}

/// Position to frequency in Hz.
///
/// Returns `0.0` when either frequency bound is `<= 0`.
pub fn map_frequency(linear_position: f32, descriptor: &ParameterDescriptor) -> f32 {
    let Some((min_hz, max_hz)) = frequency_bounds(descriptor) else {
        return 0.0;
    };

    let clamped = clamp_position(linear_position);
    let log2_min = min_hz.log2();
    let log2_max = max_hz.log2();
    (log2_min + clamped * (log2_max - log2_min)).exp2()
}

/// Frequency in Hz back to a position. Exact inverse of [`map_frequency`]
/// over the descriptor's range.
///
/// The input is clamped into `[freq_min_hz, freq_max_hz]` first; a NaN
/// frequency maps to the lower bound. Returns `0.0` when either bound is
/// `<= 0` or the log2 range is within `f32::EPSILON` of zero.
pub fn decode_frequency(freq_hz: f32, descriptor: &ParameterDescriptor) -> f32 {
    let Some((min_hz, max_hz)) = frequency_bounds(descriptor) else {
        return 0.0;
    };

    let log2_min = min_hz.log2();
    let log2_range = max_hz.log2() - log2_min;
    if log2_range.abs() < f32::EPSILON {
        return 0.0;
    }

    // `f32::clamp` panics on an inverted range; min-then-max does not.
    let clamped = if freq_hz.is_nan() {
        min_hz
    } else {
        freq_hz.min(max_hz).max(min_hz)
    };
    clamp_position((clamped.log2() - log2_min) / log2_range)
}
