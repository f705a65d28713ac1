//! Packed waypoint codec
//!
//! Each waypoint is persisted in exactly 3 bytes so that 64 of them fit in a
//! couple hundred bytes of slot storage:
//!
//! ```text
//! byte 0: rrrr cccc   row (4 bits) | column (4 bits)
//! byte 1: f ttt tttt  row-first flag (1 bit) | time_ds bits 14..8
//! byte 2: tttt tttt   time_ds bits 7..0
//! ```
//!
//! The layout is explicit shift/mask, never language bit-fields, because the
//! byte image is a persisted format and must be identical on every compiler
//! and platform.
//!
//! The codec truncates out-of-range fields (row/col to 4 bits, time to 15
//! bits); range *rejection* is the parser's job.

/// Decoded working form of one waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Waypoint {
    /// Target column, 1..=9
    pub col: u8,
    /// Target row, 1..=9
    pub row: u8,
    /// Align rows before columns when both differ
    pub row_first: bool,
    /// Not-before time point in deciseconds (15 bits)
    pub time_ds: u16,
}

/// Maximum representable time point (15 bits of deciseconds, ~54 minutes).
pub const MAX_TIME_DS: u16 = 0x7FFF;

/// The 3-byte on-wire form of a [`Waypoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedWaypoint(pub [u8; 3]);

impl PackedWaypoint {
    /// Pack a waypoint, truncating each field to its bit width.
    pub fn encode(wp: &Waypoint) -> Self {
        let time = wp.time_ds & MAX_TIME_DS;
        let b0 = ((wp.row & 0x0F) << 4) | (wp.col & 0x0F);
        let b1 = (u8::from(wp.row_first) << 7) | ((time >> 8) as u8);
        let b2 = (time & 0xFF) as u8;
        Self([b0, b1, b2])
    }

    /// Unpack the 3-byte form.
    pub fn decode(&self) -> Waypoint {
        let [b0, b1, b2] = self.0;
        Waypoint {
            col: b0 & 0x0F,
            row: b0 >> 4,
            row_first: b1 & 0x80 != 0,
            time_ds: (u16::from(b1 & 0x7F) << 8) | u16::from(b2),
        }
    }
}
