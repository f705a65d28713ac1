//! Forward drive step
//!
//! Drives the vehicle forward along the current line until the next
//! perpendicular junction line passes under both outer sensor pairs, then
//! dwells a fixed settle time so the wheel axis stops centered over the
//! junction.
//!
//! ```text
//! WaitingLine --junction on both sides--> WaitingStop --settle elapsed--> Stopped
//!      |
//!      +--no line for BLIND_TICK_LIMIT ticks--> OutOfPaper (fault)
//! ```
//!
//! While tracking, a single inner line sensor firing means the vehicle has
//! drifted the other way; the firing side is slowed so the vehicle steers
//! back over the line.

use crate::motor::{Drivetrain, MotorError};
use crate::sensor::SensorSample;

use super::{StepFault, BLIND_TICK_LIMIT, CRUISE_SPEED_PERCENT, SETTLE_MS, STEER_TRIM_PERCENT};

/// GoStep state machine phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GoState {
    /// Driving forward, watching for the junction line
    WaitingLine,
    /// Junction seen; driving out the settle dwell
    WaitingStop,
    /// Stopped over the junction (done)
    Stopped,
    /// Never found a line; stopped where it was (fault)
    OutOfPaper,
}

/// Closed-loop forward drive toward the next junction.
#[derive(Debug)]
pub struct GoStep {
    state: GoState,
    /// Timestamp of the junction detection, valid in WaitingStop
    junction_at_ms: u64,
    /// Consecutive no-line ticks since cold start
    blind_ticks: u16,
    /// A line has been seen at least once; disarms the blind guard
    seen_line: bool,
}

impl Default for GoStep {
    fn default() -> Self {
        Self::new()
    }
}

impl GoStep {
    pub fn new() -> Self {
        Self {
            state: GoState::WaitingLine,
            junction_at_ms: 0,
            blind_ticks: 0,
            seen_line: false,
        }
    }

    pub fn state(&self) -> GoState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == GoState::Stopped
    }

    pub fn fault(&self) -> Option<StepFault> {
        (self.state == GoState::OutOfPaper).then_some(StepFault::OutOfPaper)
    }

    pub fn tick(
        &mut self,
        sensors: SensorSample,
        drive: &mut dyn Drivetrain,
        now_ms: u64,
    ) -> Result<(), MotorError> {
        match self.state {
            GoState::WaitingLine => {
                if !self.seen_line {
                    if sensors.off_line() {
                        self.blind_ticks += 1;
                        if self.blind_ticks >= BLIND_TICK_LIMIT {
                            self.state = GoState::OutOfPaper;
                            return drive.stop();
                        }
                    } else {
                        self.seen_line = true;
                    }
                }

                if sensors.junction_both() {
                    self.junction_at_ms = now_ms;
                    self.state = GoState::WaitingStop;
                    return drive.set_speeds(CRUISE_SPEED_PERCENT, CRUISE_SPEED_PERCENT);
                }

                self.steer(sensors, drive)
            }
            GoState::WaitingStop => {
                if now_ms.saturating_sub(self.junction_at_ms) >= SETTLE_MS {
                    self.state = GoState::Stopped;
                    drive.stop()
                } else {
                    drive.set_speeds(CRUISE_SPEED_PERCENT, CRUISE_SPEED_PERCENT)
                }
            }
            // Terminal states hold the drivetrain stopped
            GoState::Stopped | GoState::OutOfPaper => Ok(()),
        }
    }

    /// Drive forward, slowing whichever side's inner line sensor fires.
    fn steer(&self, sensors: SensorSample, drive: &mut dyn Drivetrain) -> Result<(), MotorError> {
        let left_only = sensors.contains(SensorSample::LEFT_LINE)
            && !sensors.contains(SensorSample::RIGHT_LINE);
        let right_only = sensors.contains(SensorSample::RIGHT_LINE)
            && !sensors.contains(SensorSample::LEFT_LINE);

        let slowed = CRUISE_SPEED_PERCENT - STEER_TRIM_PERCENT;
        if left_only {
            drive.set_speeds(slowed, CRUISE_SPEED_PERCENT)
        } else if right_only {
            drive.set_speeds(CRUISE_SPEED_PERCENT, slowed)
        } else {
            drive.set_speeds(CRUISE_SPEED_PERCENT, CRUISE_SPEED_PERCENT)
        }
    }
}
