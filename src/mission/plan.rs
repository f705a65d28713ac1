//! Plan engine
//!
//! Converts elapsed mission time and the active waypoint sequence into
//! directional directives. The engine owns the vehicle's logical pose and
//! the current waypoint index; the mission itself is borrowed per call and
//! never stored, so a reload can never leave a dangling plan.
//!
//! Directives are single atomic actions: one 90-degree rotation or one
//! cell advance per call. A 180-degree reorientation therefore takes two
//! calls, and the caller re-polls after each completed physical step.

use crate::geometry::{Cell, Heading, Pose};

use super::Mission;

/// The next atomic action the vehicle should perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    /// Rotate 90 degrees counter-clockwise
    Left,
    /// Advance one cell through the next junction
    Go,
    /// Rotate 90 degrees clockwise
    Right,
    /// The next waypoint's time point has not arrived yet; re-poll later
    Wait,
    /// No waypoints remain
    Finished,
}

/// Waypoint sequencing state: logical pose plus current waypoint index.
#[derive(Debug, Clone)]
pub struct Plan {
    pose: Pose,
    index: usize,
}

impl Plan {
    /// Create a plan positioned at the mission's initial pose.
    pub fn new(mission: &Mission) -> Self {
        Self {
            pose: mission.start(),
            index: 0,
        }
    }

    /// Current logical pose of the vehicle.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Index of the waypoint currently being worked toward.
    ///
    /// Equal to the mission length once the plan is finished.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Restart from the mission's initial pose and first waypoint.
    pub fn reset(&mut self, mission: &Mission) {
        self.pose = mission.start();
        self.index = 0;
    }

    /// Next directive given total elapsed mission time in deciseconds.
    ///
    /// Directives that move the vehicle also move the logical pose, so the
    /// caller must physically complete each directive before polling again.
    /// Elapsed time must be non-decreasing across calls.
    ///
    /// A waypoint whose cell is already occupied is skipped on the spot and
    /// the following waypoint evaluated against the same elapsed time. The
    /// skip is a bounded loop (the index strictly increases), so a mission
    /// with duplicate consecutive cells degrades to skips rather than
    /// runaway recursion.
    pub fn next(&mut self, mission: &Mission, elapsed_ds: u16) -> Directive {
        while let Some(target) = mission.get(self.index) {
            if target.time_ds > elapsed_ds {
                return Directive::Wait;
            }
            let cell = Cell::new(target.col, target.row);
            if let Some(directive) = self.step_toward(cell, target.row_first) {
                return directive;
            }
            // Waypoint satisfied: evaluate the next one immediately
            self.index += 1;
        }
        Directive::Finished
    }

    /// One-shot detour directive toward the mission's initial cell.
    ///
    /// Builds a synthetic waypoint at the start cell with time point 0 and
    /// evaluates it against the current pose. The waypoint index is never
    /// touched, so normal sequencing resumes where it left off if the
    /// caller switches back.
    pub fn go_home(&mut self, mission: &Mission) -> Directive {
        match self.step_toward(mission.start().cell, false) {
            Some(directive) => directive,
            None => Directive::Finished,
        }
    }

    /// Steps 3-5 of the sequencing rule: rotate toward or advance on the
    /// target cell. Returns `None` once the pose sits on the target.
    fn step_toward(&mut self, target: Cell, row_first: bool) -> Option<Directive> {
        if self.pose.cell == target {
            return None;
        }

        let desired = self.desired_heading(target, row_first);
        if desired != self.pose.heading {
            // Minimal rotation: right if a single right rotation reaches the
            // desired heading, otherwise left (a 180 takes two lefts).
            return Some(if self.pose.heading.rotate_right() == desired {
                self.pose.heading = desired;
                Directive::Right
            } else {
                self.pose.heading = self.pose.heading.rotate_left();
                Directive::Left
            });
        }

        self.pose.advance();
        Some(Directive::Go)
    }

    /// Axis tie-break: the waypoint's row-first bit picks which axis to
    /// align first when both row and column differ.
    fn desired_heading(&self, target: Cell, row_first: bool) -> Heading {
        let here = self.pose.cell;
        let row_dir = if target.row > here.row {
            Heading::North
        } else {
            Heading::South
        };
        let col_dir = if target.col > here.col {
            Heading::East
        } else {
            Heading::West
        };

        if row_first {
            if target.row != here.row {
                row_dir
            } else {
                col_dir
            }
        } else if target.col != here.col {
            col_dir
        } else {
            row_dir
        }
    }
}
