//! Totality checks for the codec with arbitrary floats.
//!
//! quickcheck feeds NaN and infinities as well as ordinary values; none of
//! them may panic or leak NaN into the output.

use quickcheck_macros::quickcheck;
use vsl_hid_protocol::{
    ParameterDescriptor, Quantizer, ScaleModel, decode_frequency, decode_gain, encode_gain,
    map_frequency,
};

fn sanitize_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

#[quickcheck]
fn prop_encode_gain_is_finite(position: f32, a: f32, c1: f32, l: f32) -> bool {
    let d = ParameterDescriptor::new(1).with_gain_curve(
        sanitize_f32(a, -1_000.0, 1_000.0),
        sanitize_f32(c1, -1_000.0, 1_000.0),
        sanitize_f32(l, -10.0, 10.0),
    );
    encode_gain(position, &d).is_finite()
}

#[quickcheck]
fn prop_decode_gain_in_unit_range(value: f32, a: f32, c1: f32, l: f32, min_map: f32) -> bool {
    let min_map = sanitize_f32(min_map, -1.0, 1.0);
    let d = ParameterDescriptor::new(1)
        .with_gain_curve(a, c1, l)
        .with_curve_map(min_map, min_map + 1.0);
    let p = decode_gain(value, &d);
    (0.0..=1.0).contains(&p)
}

#[quickcheck]
fn prop_map_frequency_never_nan(position: f32, min_hz: f32, max_hz: f32) -> bool {
    let d = ParameterDescriptor::new(1).with_frequency_range(
        sanitize_f32(min_hz, -1.0, 1e6),
        sanitize_f32(max_hz, -1.0, 1e6),
    );
    !map_frequency(position, &d).is_nan()
}

#[quickcheck]
fn prop_decode_frequency_in_unit_range(freq: f32, min_hz: f32, max_hz: f32) -> bool {
    let d = ParameterDescriptor::new(1).with_frequency_range(
        sanitize_f32(min_hz, -1.0, 1e6),
        sanitize_f32(max_hz, -1.0, 1e6),
    );
    let p = decode_frequency(freq, &d);
    (0.0..=1.0).contains(&p)
}

#[quickcheck]
fn prop_quantize_total(value: f32, factor: f32, max: u16) -> bool {
    let d = ParameterDescriptor::new(1).with_max_encoded_int(max);
    let q = Quantizer::new(ScaleModel::Multiplier { factor });
    q.quantize(value, &d) <= max
}
