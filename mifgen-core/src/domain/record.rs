//! Record — the 8-byte fixed-layout output unit.
//!
//! Layout: year (2 bytes) ‖ month (1 byte) ‖ day (1 byte) ‖ close (4 bytes,
//! IEEE-754 single precision), all big-endian. Rendered as exactly 16
//! uppercase hex characters in the MIF body.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Errors from encoding a (date, close) pair into a record.
///
/// Out-of-range fields are rejected, never masked: a silently truncated year
/// would produce a valid-looking but wrong memory image.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("year {year} does not fit the 2-byte field (0..=65535)")]
    YearOutOfRange { year: i32 },

    #[error("{field} {value} does not fit a 1-byte field (0..=255)")]
    FieldOverflow { field: &'static str, value: u32 },
}

/// One fixed-width binary record corresponding to one input row.
///
/// Records are transient: encoded immediately before being written and never
/// retained in a collection. The MIF file is the only persisted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record([u8; 8]);

impl Record {
    /// Record width in bits, as declared in the MIF header.
    pub const WIDTH_BITS: usize = 64;

    /// Record width in bytes.
    pub const WIDTH_BYTES: usize = 8;

    /// Encode a (date, close) pair. Pure function of its inputs.
    ///
    /// The close is narrowed to single precision and its IEEE-754 bit pattern
    /// is taken as-is; non-finite values pass through as the standard
    /// NaN/Infinity patterns. Cleaning is the loader's concern, not the
    /// encoder's.
    pub fn encode(date: NaiveDate, close: f64) -> Result<Self, EncodeError> {
        let year = date.year();
        if !(0..=i32::from(u16::MAX)).contains(&year) {
            return Err(EncodeError::YearOutOfRange { year });
        }
        let month = date.month();
        if month > u32::from(u8::MAX) {
            return Err(EncodeError::FieldOverflow {
                field: "month",
                value: month,
            });
        }
        let day = date.day();
        if day > u32::from(u8::MAX) {
            return Err(EncodeError::FieldOverflow {
                field: "day",
                value: day,
            });
        }

        let mut bytes = [0u8; 8];
        bytes[0..2].copy_from_slice(&(year as u16).to_be_bytes());
        bytes[2] = month as u8;
        bytes[3] = day as u8;
        bytes[4..8].copy_from_slice(&(close as f32).to_be_bytes());
        Ok(Self(bytes))
    }

    /// The raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Render as exactly 16 uppercase hex characters.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }
}
