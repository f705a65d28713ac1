//! Mission management
//!
//! A mission is an initial pose plus an ordered sequence of packed waypoints.
//! The sequence is produced by the text [`parser`], stored in the 3-byte
//! on-wire form defined by [`codec`], executed by the [`plan`] engine and
//! persisted through the [`store`] gateway.
//!
//! Missions are replaced wholesale, never edited in place: the parser fills
//! a staging buffer and the store commits it atomically on success.

pub mod codec;
pub mod parser;
pub mod plan;
pub mod store;

use heapless::Vec;

use crate::geometry::{Cell, Heading, Pose};

pub use codec::{PackedWaypoint, Waypoint};
pub use parser::{parse_mission, ParseError};
pub use plan::{Directive, Plan};
pub use store::{MissionStore, DEFAULT_MISSION};

/// Maximum number of waypoints in a mission, dictated by the slot capacity.
pub const MAX_WAYPOINTS: usize = 64;

/// One complete mission: start pose plus packed waypoint sequence.
///
/// Waypoints stay packed in memory; the plan engine decodes the one it is
/// working on. This keeps the in-RAM footprint identical to the persisted
/// form (3 bytes per waypoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    start: Pose,
    waypoints: Vec<PackedWaypoint, MAX_WAYPOINTS>,
}

impl Default for Mission {
    fn default() -> Self {
        Self::new()
    }
}

impl Mission {
    /// Create an empty mission starting at A1 facing North.
    pub const fn new() -> Self {
        Self {
            start: Pose::new(Cell::new(1, 1), Heading::North),
            waypoints: Vec::new(),
        }
    }

    /// Initial pose of the vehicle.
    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn set_start(&mut self, start: Pose) {
        self.start = start;
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Remove all waypoints, keeping the start pose.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Append a waypoint in packed form.
    ///
    /// Returns `Err` when the mission already holds [`MAX_WAYPOINTS`].
    pub fn push(&mut self, wp: Waypoint) -> Result<(), Waypoint> {
        self.waypoints
            .push(PackedWaypoint::encode(&wp))
            .map_err(|packed| packed.decode())
    }

    /// Decode the waypoint at `index`.
    pub fn get(&self, index: usize) -> Option<Waypoint> {
        self.waypoints.get(index).map(PackedWaypoint::decode)
    }

    /// Raw packed waypoints (for persistence).
    pub fn packed(&self) -> &[PackedWaypoint] {
        &self.waypoints
    }

    /// Append an already-packed waypoint (for persistence loads).
    pub fn push_packed(&mut self, packed: PackedWaypoint) -> Result<(), PackedWaypoint> {
        self.waypoints.push(packed)
    }
}
