//! Line sensor sample contract
//!
//! The vehicle carries five downward-facing line detectors arranged across
//! the front: an edge and a line sensor on each side plus one center sensor.
//! The platform layer samples all five once per control tick and hands the
//! result to the step controllers as a [`SensorSample`].

use bitflags::bitflags;

bitflags! {
    /// One tick's worth of line detector readings.
    ///
    /// A set bit means the detector currently sees a line.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct SensorSample: u8 {
        const LEFT_EDGE = 1 << 0;
        const LEFT_LINE = 1 << 1;
        const CENTER_LINE = 1 << 2;
        const RIGHT_LINE = 1 << 3;
        const RIGHT_EDGE = 1 << 4;
    }
}

impl SensorSample {
    /// Left edge and line sensors both asserted — the left half of a
    /// perpendicular junction line is under the vehicle.
    pub fn junction_left(self) -> bool {
        self.contains(SensorSample::LEFT_EDGE | SensorSample::LEFT_LINE)
    }

    /// Right edge and line sensors both asserted.
    pub fn junction_right(self) -> bool {
        self.contains(SensorSample::RIGHT_EDGE | SensorSample::RIGHT_LINE)
    }

    /// Junction line detected on both sides at once.
    pub fn junction_both(self) -> bool {
        self.junction_left() && self.junction_right()
    }

    /// No detector sees any line at all.
    pub fn off_line(self) -> bool {
        self.is_empty()
    }
}
