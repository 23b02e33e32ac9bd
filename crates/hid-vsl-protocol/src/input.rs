//! Decoding of captured DSP control reports.
//!
//! Used to inspect traffic recorded from the vendor software; the device
//! itself is never read through this path.

use vsl_hid_common::ReportReader;

use crate::output::{DspPacket, PacketLayout};
use crate::parameter::{ParameterDescriptor, ParameterKind};
use crate::quantize::Quantizer;

/// Fields recovered from one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedReport {
    pub report_id: u8,
    /// Control word, only present in the headered layout.
    pub header: Option<u16>,
    pub packet: DspPacket,
}

/// Parse the leading bytes of a report in `layout`.
///
/// Returns `None` if `data` is shorter than [`PacketLayout::payload_len`].
/// Trailing padding is ignored.
pub fn parse_report(data: &[u8], layout: PacketLayout) -> Option<ParsedReport> {
    let mut reader = ReportReader::new(data);
    if reader.remaining() < layout.payload_len() {
        return None;
    }
    let report_id = reader.read_u8().ok()?;
    let header = match layout {
        PacketLayout::Compact => None,
        PacketLayout::Headered { .. } => Some(reader.read_u16_le().ok()?),
    };
    let param_id = reader.read_u16_le().ok()?;
    let encoded_value = reader.read_u16_le().ok()?;
    Some(ParsedReport {
        report_id,
        header,
        packet: DspPacket {
            param_id,
            encoded_value,
        },
    })
}

/// Map a captured packet back to the DSP float and control position.
///
/// Returns `(dsp_value, position)`.
pub fn decode_packet(
    packet: &DspPacket,
    kind: ParameterKind,
    quantizer: &Quantizer,
    descriptor: &ParameterDescriptor,
) -> (f32, f32) {
    let dsp_value = quantizer.dequantize(packet.encoded_value, descriptor);
    (dsp_value, kind.decode(dsp_value, descriptor))
}
