//! Mission slot storage abstraction
//!
//! The persistence medium offers a small fixed number of fixed-size slots of
//! raw bytes (an EEPROM or a reserved flash page on real hardware). The core
//! only needs whole-slot reads and writes; framing and validation live in
//! the mission store.

/// Number of mission slots offered by the medium.
pub const NUM_SLOTS: u8 = 5;

/// Size of one slot in bytes.
///
/// Must hold the full serialized mission image:
/// magic (4) + count (1) + start pose (3) + 64 packed waypoints (192)
/// + CRC-32 trailer (4).
pub const SLOT_SIZE: usize = 204;

/// Errors from slot storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Slot index outside 0..NUM_SLOTS
    InvalidSlot,
    /// Buffer length does not match SLOT_SIZE
    BadLength,
    /// Underlying medium failed
    MediumFault,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::InvalidSlot => write!(f, "slot index out of range"),
            StorageError::BadLength => write!(f, "buffer length != slot size"),
            StorageError::MediumFault => write!(f, "storage medium fault"),
        }
    }
}

/// Raw slot read/write contract implemented by the platform layer.
pub trait SlotMedium {
    /// Read one whole slot into `buf` (`buf.len()` must equal [`SLOT_SIZE`]).
    fn read_slot(&self, slot: u8, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Overwrite one whole slot from `data` (`data.len()` must equal
    /// [`SLOT_SIZE`]).
    fn write_slot(&mut self, slot: u8, data: &[u8]) -> Result<(), StorageError>;
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// In-memory slot medium for host tests.
///
/// Fresh slots read as 0xFF, matching the erased state of EEPROM/flash.
pub struct MockMedium {
    slots: [[u8; SLOT_SIZE]; NUM_SLOTS as usize],
}

impl Default for MockMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMedium {
    pub fn new() -> Self {
        Self {
            slots: [[0xFF; SLOT_SIZE]; NUM_SLOTS as usize],
        }
    }

    /// Corrupt one byte of a slot (for testing validation paths).
    pub fn corrupt(&mut self, slot: u8, offset: usize) {
        self.slots[slot as usize][offset] ^= 0xA5;
    }
}

impl SlotMedium for MockMedium {
    fn read_slot(&self, slot: u8, buf: &mut [u8]) -> Result<(), StorageError> {
        if slot >= NUM_SLOTS {
            return Err(StorageError::InvalidSlot);
        }
        if buf.len() != SLOT_SIZE {
            return Err(StorageError::BadLength);
        }
        buf.copy_from_slice(&self.slots[slot as usize]);
        Ok(())
    }

    fn write_slot(&mut self, slot: u8, data: &[u8]) -> Result<(), StorageError> {
        if slot >= NUM_SLOTS {
            return Err(StorageError::InvalidSlot);
        }
        if data.len() != SLOT_SIZE {
            return Err(StorageError::BadLength);
        }
        self.slots[slot as usize].copy_from_slice(data);
        Ok(())
    }
}
