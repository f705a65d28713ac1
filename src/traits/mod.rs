//! Platform service traits
//!
//! Abstractions over the services the core logic needs from the platform:
//! a monotonic clock and raw mission slot storage. Mock implementations are
//! always available so host tests run without hardware.

pub mod storage;
pub mod time;

pub use storage::{MockMedium, SlotMedium, StorageError, NUM_SLOTS, SLOT_SIZE};
pub use time::{MockTime, TimeSource};
