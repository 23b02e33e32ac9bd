//! AudioBox VSL DSP protocol: parameter curves, quantization and report encoding.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested without hardware
//! or OS-level HID plumbing.
//!
//! The outbound path is:
//!
//! ```text
//! position (0..1) --codec--> DSP float --Quantizer--> u16 --PacketEncoder--> [u8; 64]
//! ```
//!
//! ## Provenance
//!
//! The curve formulas and the parameter structure were recovered by
//! disassembling the vendor's Linux control library. The following are
//! **not** confirmed against hardware and are therefore explicit
//! configuration instead of constants:
//!
//! - the float to integer scale ([`ScaleModel`]),
//! - the report byte layout ([`PacketLayout`]),
//! - the report ID ([`ids::report_ids::DSP_CONTROL`] is the best guess).

pub mod codec;
pub mod ids;
pub mod input;
pub mod output;
pub mod parameter;
pub mod quantize;

pub use codec::{clamp_position, decode_frequency, decode_gain, encode_gain, map_frequency};
pub use ids::{VSL_VENDOR_ID, is_vsl_product, parameter_ids, product_ids, report_ids};
pub use input::{ParsedReport, decode_packet, parse_report};
pub use output::{DspPacket, DspReport, PacketEncoder, PacketLayout, REPORT_LEN};
pub use parameter::{
    DEFAULT_MAX_ENCODED_INT, ParameterDescriptor, ParameterError, ParameterKind,
    audiobox_gain_ch1, audiobox_hpf_ch1,
};
pub use quantize::{Quantizer, ScaleModel};
