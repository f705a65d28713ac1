//! Time abstraction for platform-agnostic timing operations.
//!
//! Provides the `TimeSource` trait that abstracts over different time
//! providers (hardware timer, mock) so the control loops can be tested on
//! host with fully controllable time.

use core::cell::Cell;

/// Platform-agnostic monotonic millisecond clock.
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns elapsed time in milliseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with controllable advancement.
///
/// # Example
///
/// ```
/// use grid_trail::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance(250);
/// assert_eq!(time.now_ms(), 250);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}
