//! In-place turn step
//!
//! Rotates the vehicle 90 degrees by spinning the wheels in opposite
//! directions and watching the line move across the sensor bar:
//!
//! ```text
//! Start --center lost--> LostCenter --swept-side line--> LineOutside
//!        --center re-acquired--> FoundCenter (done, motors stopped)
//! ```
//!
//! The middle state confirms the turn has swept past the old heading's
//! line before the center sensor is trusted again; without it a slightly
//! late center reading would end the turn on the line it started from.
//! No timeout: the grid guarantees a line on the new heading.

use crate::motor::{Drivetrain, MotorError};
use crate::sensor::SensorSample;

use super::TURN_SPEED_PERCENT;

/// Which way to rotate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurnDirection {
    Left,
    Right,
}

/// TurnStep state machine phases, visited in strict order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TurnState {
    /// Spinning, still over the old heading's line
    Start,
    /// Center sensor has de-asserted
    LostCenter,
    /// A swept-side sensor has crossed a line
    LineOutside,
    /// Center re-acquired; motors stopped (done)
    FoundCenter,
}

/// Closed-loop 90-degree rotation.
#[derive(Debug)]
pub struct TurnStep {
    direction: TurnDirection,
    state: TurnState,
}

impl TurnStep {
    pub fn new(direction: TurnDirection) -> Self {
        Self {
            direction,
            state: TurnState::Start,
        }
    }

    pub fn direction(&self) -> TurnDirection {
        self.direction
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TurnState::FoundCenter
    }

    pub fn tick(
        &mut self,
        sensors: SensorSample,
        drive: &mut dyn Drivetrain,
        _now_ms: u64,
    ) -> Result<(), MotorError> {
        // At most one transition per tick keeps the state order strict even
        // if the sensors jump (e.g. a tick cadence slower than the sweep).
        match self.state {
            TurnState::Start => {
                if !sensors.contains(SensorSample::CENTER_LINE) {
                    self.state = TurnState::LostCenter;
                }
                self.spin(drive)
            }
            TurnState::LostCenter => {
                if self.outside_line(sensors) {
                    self.state = TurnState::LineOutside;
                }
                self.spin(drive)
            }
            TurnState::LineOutside => {
                if sensors.contains(SensorSample::CENTER_LINE) {
                    self.state = TurnState::FoundCenter;
                    return drive.stop();
                }
                self.spin(drive)
            }
            TurnState::FoundCenter => Ok(()),
        }
    }

    /// Opposite-sign wheel speeds rotate the vehicle about its axle center.
    fn spin(&self, drive: &mut dyn Drivetrain) -> Result<(), MotorError> {
        match self.direction {
            TurnDirection::Right => drive.set_speeds(TURN_SPEED_PERCENT, -TURN_SPEED_PERCENT),
            TurnDirection::Left => drive.set_speeds(-TURN_SPEED_PERCENT, TURN_SPEED_PERCENT),
        }
    }

    /// Edge or line sensor on the side being swept toward.
    fn outside_line(&self, sensors: SensorSample) -> bool {
        match self.direction {
            TurnDirection::Right => {
                sensors.intersects(SensorSample::RIGHT_EDGE | SensorSample::RIGHT_LINE)
            }
            TurnDirection::Left => {
                sensors.intersects(SensorSample::LEFT_EDGE | SensorSample::LEFT_LINE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::MockDrive;

    const CENTERED: SensorSample = SensorSample::CENTER_LINE;

    fn run_turn(direction: TurnDirection) -> (TurnStep, MockDrive, std::vec::Vec<TurnState>) {
        let mut drive = MockDrive::new();
        let mut step = TurnStep::new(direction);
        let mut states = std::vec::Vec::new();

        let outside = match direction {
            TurnDirection::Right => SensorSample::RIGHT_LINE,
            TurnDirection::Left => SensorSample::LEFT_LINE,
        };

        // Phase 1: still on the old line
        for _ in 0..3 {
            step.tick(CENTERED, &mut drive, 0).unwrap();
            states.push(step.state());
        }
        // Phase 2: off the old line, nothing outside yet
        for _ in 0..3 {
            step.tick(SensorSample::empty(), &mut drive, 0).unwrap();
            states.push(step.state());
        }
        // Phase 3: the new line reaches the swept-side sensor
        step.tick(outside, &mut drive, 0).unwrap();
        states.push(step.state());
        // Phase 4: center re-acquired
        step.tick(CENTERED, &mut drive, 0).unwrap();
        states.push(step.state());

        (step, drive, states)
    }

    #[test]
    fn test_right_turn_visits_states_in_strict_order() {
        let (step, drive, states) = run_turn(TurnDirection::Right);

        assert!(step.is_done());
        assert_eq!(drive.stops, 1);
        assert_eq!(
            states,
            [
                TurnState::Start,      // center still held after first tick
                TurnState::Start,
                TurnState::Start,
                TurnState::LostCenter, // center gone
                TurnState::LostCenter,
                TurnState::LostCenter,
                TurnState::LineOutside,
                TurnState::FoundCenter,
            ]
        );
    }

    #[test]
    fn test_left_turn_visits_states_in_strict_order() {
        let (step, _, states) = run_turn(TurnDirection::Left);
        assert!(step.is_done());
        assert_eq!(states.last(), Some(&TurnState::FoundCenter));
        assert!(states.contains(&TurnState::LostCenter));
        assert!(states.contains(&TurnState::LineOutside));
    }

    #[test]
    fn test_cannot_skip_lost_center() {
        // Center asserted the whole time: even with an outside line firing,
        // the step must stay in Start until the center de-asserts.
        let mut drive = MockDrive::new();
        let mut step = TurnStep::new(TurnDirection::Right);

        let center_and_outside = SensorSample::CENTER_LINE | SensorSample::RIGHT_LINE;
        for _ in 0..5 {
            step.tick(center_and_outside, &mut drive, 0).unwrap();
        }
        assert_eq!(step.state(), TurnState::Start);
        assert!(!step.is_done());
    }

    #[test]
    fn test_cannot_finish_from_lost_center() {
        // Center reappearing before the outside line is seen must not end
        // the turn: that's the old heading's line.
        let mut drive = MockDrive::new();
        let mut step = TurnStep::new(TurnDirection::Right);

        step.tick(CENTERED, &mut drive, 0).unwrap();
        step.tick(SensorSample::empty(), &mut drive, 0).unwrap();
        assert_eq!(step.state(), TurnState::LostCenter);

        step.tick(CENTERED, &mut drive, 0).unwrap();
        assert_eq!(step.state(), TurnState::LostCenter);
        assert!(!step.is_done());
    }

    #[test]
    fn test_spin_directions() {
        let mut drive = MockDrive::new();
        let mut right = TurnStep::new(TurnDirection::Right);
        right.tick(CENTERED, &mut drive, 0).unwrap();
        assert_eq!(
            drive.last_speeds(),
            Some((TURN_SPEED_PERCENT, -TURN_SPEED_PERCENT))
        );

        let mut left = TurnStep::new(TurnDirection::Left);
        left.tick(CENTERED, &mut drive, 0).unwrap();
        assert_eq!(
            drive.last_speeds(),
            Some((-TURN_SPEED_PERCENT, TURN_SPEED_PERCENT))
        );
    }

    #[test]
    fn test_left_turn_watches_left_sensors() {
        let mut drive = MockDrive::new();
        let mut step = TurnStep::new(TurnDirection::Left);

        step.tick(CENTERED, &mut drive, 0).unwrap();
        step.tick(SensorSample::empty(), &mut drive, 0).unwrap();
        assert_eq!(step.state(), TurnState::LostCenter);

        // Right-side sensor is irrelevant for a left turn
        step.tick(SensorSample::RIGHT_LINE, &mut drive, 0).unwrap();
        assert_eq!(step.state(), TurnState::LostCenter);

        step.tick(SensorSample::LEFT_EDGE, &mut drive, 0).unwrap();
        assert_eq!(step.state(), TurnState::LineOutside);
    }

    #[test]
    fn test_done_state_holds_motors_stopped() {
        let (mut step, mut drive, _) = run_turn(TurnDirection::Right);
        let commands_before = drive.commands.len();

        step.tick(CENTERED, &mut drive, 0).unwrap();
        assert_eq!(drive.commands.len(), commands_before);
        assert!(step.is_done());
    }
}
