//! Closed-loop step control
//!
//! Converts one plan directive into real-time differential-drive actuation
//! until a physical milestone is observed: a junction line for [`GoStep`], a
//! re-centered heading for [`TurnStep`]. Steps are polled once per control
//! tick with a fresh [`SensorSample`](crate::sensor::SensorSample) and never
//! block.
//!
//! The three variants share the `{tick, is_done, fault}` shape through the
//! [`Step`] sum type, dispatched by the [`executor`] — no dynamic
//! allocation, no virtual dispatch.

pub mod executor;
pub mod go;
pub mod turn;

use crate::motor::{Drivetrain, MotorError};
use crate::sensor::SensorSample;

pub use executor::{Executor, RunState};
pub use go::{GoState, GoStep};
pub use turn::{TurnDirection, TurnState, TurnStep};

/// Nominal forward speed in signed percent.
pub const CRUISE_SPEED_PERCENT: i8 = 33;

/// In-place rotation speed in signed percent.
pub const TURN_SPEED_PERCENT: i8 = 25;

/// Amount subtracted from the slowed side when correcting drift.
pub const STEER_TRIM_PERCENT: i8 = 12;

/// Dwell after junction detection before stopping, so the wheel axis ends
/// up centered over the junction rather than the sensors.
pub const SETTLE_MS: u64 = 300;

/// GoStep ticks without any line in sight before declaring out-of-paper.
pub const BLIND_TICK_LIMIT: u16 = 100;

/// Non-recoverable step completion, distinct from normal `is_done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepFault {
    /// GoStep never saw a line: the vehicle has left the ruled surface
    OutOfPaper,
}

/// Pass-through step for the `Wait` directive.
///
/// Applies no actuation and is done immediately, so the orchestrator
/// re-polls the plan engine on the very next tick — `Wait` only means
/// "not yet time", not "hold position for a duration".
#[derive(Debug, Default)]
pub struct WaitStep;

impl WaitStep {
    pub fn tick(
        &mut self,
        _sensors: SensorSample,
        _drive: &mut dyn Drivetrain,
        _now_ms: u64,
    ) -> Result<(), MotorError> {
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        true
    }
}

/// One in-flight step controller.
#[derive(Debug)]
pub enum Step {
    Wait(WaitStep),
    Go(GoStep),
    Turn(TurnStep),
}

impl Step {
    /// Advance the controller by one tick of sensor data.
    pub fn tick(
        &mut self,
        sensors: SensorSample,
        drive: &mut dyn Drivetrain,
        now_ms: u64,
    ) -> Result<(), MotorError> {
        match self {
            Step::Wait(s) => s.tick(sensors, drive, now_ms),
            Step::Go(s) => s.tick(sensors, drive, now_ms),
            Step::Turn(s) => s.tick(sensors, drive, now_ms),
        }
    }

    /// True once the step's milestone has been reached.
    pub fn is_done(&self) -> bool {
        match self {
            Step::Wait(s) => s.is_done(),
            Step::Go(s) => s.is_done(),
            Step::Turn(s) => s.is_done(),
        }
    }

    /// Non-recoverable completion, if any.
    pub fn fault(&self) -> Option<StepFault> {
        match self {
            Step::Go(s) => s.fault(),
            _ => None,
        }
    }
}
