//! Cursor helper for decoding captured HID reports.
//!
//! The reader borrows its buffer, so decoding a captured slice never
//! allocates.

use crate::{HidCommonError, HidCommonResult};

/// Sequential little-endian reader over a borrowed report.
#[derive(Debug, Clone)]
pub struct ReportReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ReportReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let value = *self
            .data
            .get(self.position)
            .ok_or_else(|| end_of_data(self.position))?;
        self.position = self.position.saturating_add(1);
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }
}

fn end_of_data(position: usize) -> HidCommonError {
    HidCommonError::InvalidReport(format!("Unexpected end of report at byte {position}"))
}
