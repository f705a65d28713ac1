//! Mission persistence gateway
//!
//! Owns the active mission and the parse staging buffer, and moves missions
//! in and out of the fixed-size storage slots. The active mission is only
//! ever replaced wholesale: text and slot loads both decode into staging and
//! commit with a single swap, so a failed load can never leave the plan
//! engine looking at a half-written sequence.
//!
//! # Slot image
//!
//! ```text
//! [0..4)    magic "GTM1"
//! [4]       waypoint count
//! [5..8)    start pose: column, row, heading index
//! [8..200)  64 x 3-byte packed waypoints
//! [200..204) CRC-32/ISO-HDLC over bytes 0..200, little-endian
//! ```
//!
//! A slot whose magic or CRC does not check out reads as empty; erased
//! media (all 0xFF) therefore needs no special casing.

use crc::{Crc, CRC_32_ISO_HDLC};

use crate::geometry::{Cell, Heading, Pose};
use crate::traits::storage::{SlotMedium, StorageError, NUM_SLOTS, SLOT_SIZE};

use super::codec::PackedWaypoint;
use super::parser::{parse_mission, ParseError};
use super::{Mission, MAX_WAYPOINTS};

/// CRC-32 algorithm shared with the parameter-block framing convention.
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Magic prefix of a valid slot image.
const SLOT_MAGIC: [u8; 4] = *b"GTM1";

const COUNT_OFFSET: usize = 4;
const POSE_OFFSET: usize = 5;
const WAYPOINT_OFFSET: usize = 8;
const CRC_OFFSET: usize = SLOT_SIZE - 4;

/// Fallback mission used when every slot is empty.
pub const DEFAULT_MISSION: &str = "B1N E1T150 b2T350 3At450 4CT567 D2T700";

/// Active/staging mission pair plus slot (de)serialization.
pub struct MissionStore {
    active: Mission,
    staging: Mission,
}

impl Default for MissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionStore {
    /// Create a store with an empty active mission.
    pub const fn new() -> Self {
        Self {
            active: Mission::new(),
            staging: Mission::new(),
        }
    }

    /// The currently active mission.
    ///
    /// The reference is valid until the next successful load replaces it.
    pub fn active(&self) -> &Mission {
        &self.active
    }

    /// Parse mission text and commit it as the active mission.
    ///
    /// On any parse error the previously active mission is untouched.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ParseError> {
        parse_mission(text, &mut self.staging)?;
        core::mem::swap(&mut self.active, &mut self.staging);
        Ok(())
    }

    /// Serialize the active mission into a storage slot.
    pub fn save_to_slot(
        &self,
        medium: &mut dyn SlotMedium,
        slot: u8,
    ) -> Result<(), StorageError> {
        let mut image = [0u8; SLOT_SIZE];
        image[..4].copy_from_slice(&SLOT_MAGIC);
        image[COUNT_OFFSET] = self.active.len() as u8;

        let start = self.active.start();
        image[POSE_OFFSET] = start.cell.col;
        image[POSE_OFFSET + 1] = start.cell.row;
        image[POSE_OFFSET + 2] = start.heading.to_index();

        for (i, packed) in self.active.packed().iter().enumerate() {
            let at = WAYPOINT_OFFSET + i * 3;
            image[at..at + 3].copy_from_slice(&packed.0);
        }

        let crc = CRC32.checksum(&image[..CRC_OFFSET]);
        image[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());

        medium.write_slot(slot, &image)
    }

    /// Load a slot into the active mission.
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` when the slot is empty or
    /// fails validation — in both of the latter cases the active mission is
    /// untouched. `Err` is reserved for medium failures.
    pub fn load_from_slot(
        &mut self,
        medium: &dyn SlotMedium,
        slot: u8,
    ) -> Result<bool, StorageError> {
        let mut image = [0u8; SLOT_SIZE];
        medium.read_slot(slot, &mut image)?;

        if !self.decode_into_staging(&image) {
            return Ok(false);
        }
        core::mem::swap(&mut self.active, &mut self.staging);
        Ok(true)
    }

    /// Erase a slot back to the empty state.
    pub fn clear_slot(medium: &mut dyn SlotMedium, slot: u8) -> Result<(), StorageError> {
        medium.write_slot(slot, &[0xFF; SLOT_SIZE])
    }

    /// Activate the first slot holding a non-empty mission, or the built-in
    /// fallback mission when no slot does.
    ///
    /// Returns the slot that was loaded, or `None` for the fallback.
    pub fn load_default(&mut self, medium: &dyn SlotMedium) -> Option<u8> {
        for slot in 0..NUM_SLOTS {
            if let Ok(true) = self.load_from_slot(medium, slot) {
                if !self.active.is_empty() {
                    return Some(slot);
                }
            }
        }
        // The fallback literal is known-good; a parse failure here would be
        // a programming error, and the active mission stays empty.
        let _ = self.load_from_str(DEFAULT_MISSION);
        None
    }

    /// Validate and decode a slot image into the staging mission.
    fn decode_into_staging(&mut self, image: &[u8; SLOT_SIZE]) -> bool {
        if image[..4] != SLOT_MAGIC {
            return false;
        }

        let stored_crc = u32::from_le_bytes([
            image[CRC_OFFSET],
            image[CRC_OFFSET + 1],
            image[CRC_OFFSET + 2],
            image[CRC_OFFSET + 3],
        ]);
        if CRC32.checksum(&image[..CRC_OFFSET]) != stored_crc {
            return false;
        }

        let count = image[COUNT_OFFSET] as usize;
        if count > MAX_WAYPOINTS {
            return false;
        }

        let cell = Cell::new(image[POSE_OFFSET], image[POSE_OFFSET + 1]);
        if !cell.in_bounds() || image[POSE_OFFSET + 2] > 3 {
            return false;
        }

        self.staging.clear();
        self.staging.set_start(Pose::new(
            cell,
            Heading::from_index(image[POSE_OFFSET + 2]),
        ));
        for i in 0..count {
            let at = WAYPOINT_OFFSET + i * 3;
            let packed = PackedWaypoint([image[at], image[at + 1], image[at + 2]]);
            // Capacity checked against MAX_WAYPOINTS above
            let _ = self.staging.push_packed(packed);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::storage::MockMedium;

    #[test]
    fn test_load_from_str_commits_on_success() {
        let mut store = MissionStore::new();
        store.load_from_str("B1N E1T150").unwrap();

        assert_eq!(store.active().len(), 1);
        assert_eq!(store.active().start().cell, Cell::new(2, 1));
    }

    #[test]
    fn test_failed_parse_leaves_active_untouched() {
        let mut store = MissionStore::new();
        store.load_from_str("B1N E1T150 C3T200").unwrap();
        let before = store.active().clone();

        // InvalidCoords, InvalidTime and PlanTooLong all abort pre-commit
        assert_eq!(
            store.load_from_str("B1N J9T100"),
            Err(ParseError::InvalidCoords)
        );
        assert_eq!(store.active(), &before);

        assert_eq!(
            store.load_from_str("B1N E1T0"),
            Err(ParseError::InvalidTime)
        );
        assert_eq!(store.active(), &before);
    }

    #[test]
    fn test_slot_round_trip() {
        let mut medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str(DEFAULT_MISSION).unwrap();
        let saved = store.active().clone();

        store.save_to_slot(&mut medium, 2).unwrap();

        // Overwrite the active mission, then restore from the slot
        store.load_from_str("A1N").unwrap();
        assert!(store.load_from_slot(&medium, 2).unwrap());
        assert_eq!(store.active(), &saved);
    }

    #[test]
    fn test_erased_slot_reads_empty() {
        let medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str("B1N E1T150").unwrap();
        let before = store.active().clone();

        assert!(!store.load_from_slot(&medium, 0).unwrap());
        assert_eq!(store.active(), &before);
    }

    #[test]
    fn test_corrupted_slot_reads_empty() {
        let mut medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str(DEFAULT_MISSION).unwrap();
        store.save_to_slot(&mut medium, 1).unwrap();
        let before = store.active().clone();

        // Flip a byte in the waypoint area: CRC must catch it
        medium.corrupt(1, 20);
        assert!(!store.load_from_slot(&medium, 1).unwrap());
        assert_eq!(store.active(), &before);
    }

    #[test]
    fn test_clear_slot() {
        let mut medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str(DEFAULT_MISSION).unwrap();
        store.save_to_slot(&mut medium, 0).unwrap();
        assert!(store.load_from_slot(&medium, 0).unwrap());

        MissionStore::clear_slot(&mut medium, 0).unwrap();
        assert!(!store.load_from_slot(&medium, 0).unwrap());
    }

    #[test]
    fn test_load_default_prefers_first_nonempty_slot() {
        let mut medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str("C3E D3T100").unwrap();
        store.save_to_slot(&mut medium, 3).unwrap();

        let mut fresh = MissionStore::new();
        assert_eq!(fresh.load_default(&medium), Some(3));
        assert_eq!(fresh.active().start().cell, Cell::new(3, 3));
    }

    #[test]
    fn test_load_default_falls_back_to_builtin() {
        let medium = MockMedium::new();
        let mut store = MissionStore::new();

        assert_eq!(store.load_default(&medium), None);
        assert_eq!(store.active().len(), 5);
        assert_eq!(store.active().start().cell, Cell::new(2, 1));
        assert_eq!(store.active().start().heading, Heading::North);
    }

    #[test]
    fn test_empty_mission_round_trips() {
        let mut medium = MockMedium::new();
        let mut store = MissionStore::new();
        store.load_from_str("D4W").unwrap();
        store.save_to_slot(&mut medium, 0).unwrap();

        let mut fresh = MissionStore::new();
        assert!(fresh.load_from_slot(&medium, 0).unwrap());
        assert!(fresh.active().is_empty());
        assert_eq!(fresh.active().start().cell, Cell::new(4, 4));
        assert_eq!(fresh.active().start().heading, Heading::West);
    }
}
