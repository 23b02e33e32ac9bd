//! USB identity and DSP parameter ID constants for the AudioBox VSL family.
//!
//! The VID/PID pair matches the `usb_device_id` table of the out-of-tree
//! AudioBox VSL kernel module. The report ID and the parameter IDs come from
//! disassembly of the vendor control library and are **unconfirmed** against
//! a live capture; deployments can override all of them from config.

/// PreSonus USB vendor ID.
pub const VSL_VENDOR_ID: u16 = 0x194F;

/// Product IDs of supported interfaces.
pub mod product_ids {
    /// AudioBox 22 VSL.
    pub const AUDIOBOX_22_VSL: u16 = 0x0101;
}

/// Report IDs prepended to every DSP control report.
pub mod report_ids {
    /// DSP parameter write (reference hardware, unconfirmed).
    pub const DSP_CONTROL: u8 = 0x06;
}

/// DSP parameter IDs recovered from the vendor control library.
pub mod parameter_ids {
    /// Input gain, channel 1 (exponential curve).
    pub const GAIN_CH1: u16 = 0x1A01;
    /// High-pass filter corner frequency, channel 1 (logarithmic curve).
    pub const HPF_FREQ_CH1: u16 = 0x2B05;
}

/// Returns `true` when `(vendor_id, product_id)` is a known VSL interface.
pub fn is_vsl_product(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VSL_VENDOR_ID && matches!(product_id, product_ids::AUDIOBOX_22_VSL)
}
