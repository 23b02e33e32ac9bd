//! DSP control report encoding.
//!
//! All encoding is pure and allocation-free. Reports are fixed at
//! [`REPORT_LEN`] bytes regardless of layout; unused bytes are zero.
//!
//! Two byte layouts appear in the vendor sources and neither is confirmed on
//! hardware, so the layout is an explicit choice:
//!
//! | Layout | Bytes |
//! |---|---|
//! | [`PacketLayout::Compact`] | `[rid, id_lo, id_hi, val_lo, val_hi, 0..]` |
//! | [`PacketLayout::Headered`] | `[rid, hdr_lo, hdr_hi, id_lo, id_hi, val_lo, val_hi, 0..]` |

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterDescriptor;
use crate::quantize::Quantizer;

/// Wire size of every DSP control report, report ID included.
pub const REPORT_LEN: usize = 64;

/// Byte layout after the report ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PacketLayout {
    /// Parameter ID at bytes 1 to 2, value at bytes 3 to 4.
    Compact,
    /// A 16-bit control word at bytes 1 to 2, then parameter ID and value.
    Headered {
        #[serde(default)]
        header: u16,
    },
}

impl PacketLayout {
    /// Bytes carrying data, report ID included. Everything after is padding.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Compact => 5,
            Self::Headered { .. } => 7,
        }
    }

    /// Offset of the little-endian parameter ID.
    pub(crate) fn id_offset(&self) -> usize {
        match self {
            Self::Compact => 1,
            Self::Headered { .. } => 3,
        }
    }
}

impl std::fmt::Display for PacketLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Headered { header } => write!(f, "headered (0x{header:04X})"),
        }
    }
}

/// One parameter write: which control, and its quantized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DspPacket {
    pub param_id: u16,
    pub encoded_value: u16,
}

/// Builds DSP control reports for one device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketEncoder {
    report_id: u8,
    layout: PacketLayout,
    quantizer: Quantizer,
}

impl PacketEncoder {
    pub fn new(report_id: u8, layout: PacketLayout, quantizer: Quantizer) -> Self {
        Self {
            report_id,
            layout,
            quantizer,
        }
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn layout(&self) -> PacketLayout {
        self.layout
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Pack `packet` into `out`. Returns the number of bytes to write,
    /// always [`REPORT_LEN`].
    ///
    /// Compact layout:
    /// - Byte 0: report ID
    /// - Bytes 1-2: parameter ID, little-endian
    /// - Bytes 3-4: encoded value, little-endian
    /// - Bytes 5-63: zero
    ///
    /// Headered layout shifts ID and value right by two bytes and places the
    /// header word, little-endian, at bytes 1-2.
    pub fn encode(&self, packet: &DspPacket, out: &mut [u8; REPORT_LEN]) -> usize {
        out.fill(0);
        out[0] = self.report_id;
        if let PacketLayout::Headered { header } = self.layout {
            let header = header.to_le_bytes();
            out[1] = header[0];
            out[2] = header[1];
        }
        let at = self.layout.id_offset();
        let id = packet.param_id.to_le_bytes();
        let value = packet.encoded_value.to_le_bytes();
        out[at] = id[0];
        out[at + 1] = id[1];
        out[at + 2] = value[0];
        out[at + 3] = value[1];
        REPORT_LEN
    }

    /// Quantize `dsp_value` for `descriptor` and pack it under `param_id`.
    pub fn build_packet(
        &self,
        param_id: u16,
        dsp_value: f32,
        descriptor: &ParameterDescriptor,
    ) -> DspReport {
        let packet = DspPacket {
            param_id,
            encoded_value: self.quantizer.quantize(dsp_value, descriptor),
        };
        let mut bytes = [0u8; REPORT_LEN];
        self.encode(&packet, &mut bytes);
        DspReport {
            bytes,
            packet,
            payload_len: self.layout.payload_len(),
        }
    }
}

/// A fully encoded report ready for the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DspReport {
    bytes: [u8; REPORT_LEN],
    packet: DspPacket,
    payload_len: usize,
}

impl DspReport {
    pub fn as_bytes(&self) -> &[u8; REPORT_LEN] {
        &self.bytes
    }

    pub fn packet(&self) -> DspPacket {
        self.packet
    }

    pub fn report_id(&self) -> u8 {
        self.bytes[0]
    }

    /// The non-padding prefix of the report.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.payload_len]
    }

    /// Upper-case hex of the first `n` bytes, space separated.
    pub fn hex_dump(&self, n: usize) -> String {
        let mut out = String::with_capacity(n.min(REPORT_LEN) * 3);
        for (i, byte) in self.bytes.iter().take(n).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{byte:02X}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{parameter_ids, report_ids};
    use crate::parameter::audiobox_gain_ch1;
    use crate::quantize::ScaleModel;

    fn compact() -> PacketEncoder {
        PacketEncoder::new(
            report_ids::DSP_CONTROL,
            PacketLayout::Compact,
            Quantizer::new(ScaleModel::DSP_FULL_SCALE),
        )
    }

    #[test]
    fn test_compact_layout() {
        let mut out = [0xAAu8; REPORT_LEN];
        let len = compact().encode(
            &DspPacket {
                param_id: 0x1A01,
                encoded_value: 40793,
            },
            &mut out,
        );
        assert_eq!(len, REPORT_LEN);
        assert_eq!(&out[..5], &[0x06, 0x01, 0x1A, 0x59, 0x9F]);
        assert!(out[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_headered_layout() {
        let encoder = PacketEncoder::new(
            0x06,
            PacketLayout::Headered { header: 0xBEEF },
            Quantizer::new(ScaleModel::DSP_FULL_SCALE),
        );
        let mut out = [0u8; REPORT_LEN];
        encoder.encode(
            &DspPacket {
                param_id: 0x2B05,
                encoded_value: 0x0102,
            },
            &mut out,
        );
        assert_eq!(&out[..7], &[0x06, 0xEF, 0xBE, 0x05, 0x2B, 0x02, 0x01]);
        assert!(out[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_build_packet_reference_gain() {
        let report = compact().build_packet(parameter_ids::GAIN_CH1, 622.455, &audiobox_gain_ch1());
        assert_eq!(report.packet().encoded_value, 40793);
        assert_eq!(report.payload(), &[0x06, 0x01, 0x1A, 0x59, 0x9F]);
        assert_eq!(report.as_bytes().len(), REPORT_LEN);
        assert_eq!(report.report_id(), 0x06);
    }

    #[test]
    fn test_hex_dump() {
        let report = compact().build_packet(parameter_ids::GAIN_CH1, 622.455, &audiobox_gain_ch1());
        assert_eq!(report.hex_dump(5), "06 01 1A 59 9F");
        assert_eq!(report.hex_dump(0), "");
        assert_eq!(report.hex_dump(1000).len(), REPORT_LEN * 3 - 1);
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(PacketLayout::Compact.to_string(), "compact");
        assert_eq!(
            PacketLayout::Headered { header: 0 }.to_string(),
            "headered (0x0000)"
        );
    }
}
