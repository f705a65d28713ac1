//! Execution orchestrator
//!
//! Ties the plan engine's directives to the step controllers across control
//! ticks. One step controller is in flight at a time; when it reports done
//! the next directive is fetched and a fresh controller swapped in. A
//! go-home request is a soft redirect: it changes which plan query feeds
//! the next fetch, never interrupting the controller already moving the
//! vehicle.

use crate::mission::codec::MAX_TIME_DS;
use crate::mission::{Directive, Mission, Plan};
use crate::motor::{Drivetrain, MotorError};
use crate::sensor::SensorSample;

use super::{GoStep, Step, StepFault, TurnDirection, TurnStep, WaitStep};

/// Orchestrator lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// No mission started
    #[default]
    Idle,
    /// Following the waypoint sequence
    Executing,
    /// Detouring to the mission's initial cell
    ReturningHome,
}

/// Drives a mission to completion one tick at a time.
pub struct Executor {
    plan: Plan,
    step: Option<Step>,
    state: RunState,
    /// Clock origin of the running mission (ms)
    started_at_ms: u64,
    finished: bool,
    fault: Option<StepFault>,
}

impl Executor {
    /// Create an idle executor for the given mission.
    pub fn new(mission: &Mission) -> Self {
        Self {
            plan: Plan::new(mission),
            step: None,
            state: RunState::Idle,
            started_at_ms: 0,
            finished: false,
            fault: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// True once the mission (or the go-home detour) has run out of
    /// directives, or a fault ended execution early.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The fault that ended execution, if any.
    pub fn fault(&self) -> Option<StepFault> {
        self.fault
    }

    /// Begin executing from the mission's initial pose.
    ///
    /// Resets the clock origin to `now_ms` and loads the first directive.
    pub fn start(&mut self, mission: &Mission, now_ms: u64) {
        self.plan.reset(mission);
        self.state = RunState::Executing;
        self.started_at_ms = now_ms;
        self.finished = false;
        self.fault = None;
        self.fetch_next(mission, now_ms);
    }

    /// Advance execution by one control tick.
    ///
    /// Feeds the sensors to the in-flight step controller and, when it
    /// completes, swaps in the controller for the next directive.
    pub fn tick(
        &mut self,
        mission: &Mission,
        sensors: SensorSample,
        drive: &mut dyn Drivetrain,
        now_ms: u64,
    ) -> Result<(), MotorError> {
        if self.state == RunState::Idle || self.finished {
            return Ok(());
        }

        let Some(step) = self.step.as_mut() else {
            return Ok(());
        };
        step.tick(sensors, drive, now_ms)?;

        if let Some(fault) = step.fault() {
            // The step already stopped the motors; surface the fault
            // instead of silently finishing.
            self.fault = Some(fault);
            self.finished = true;
            self.step = None;
            return Ok(());
        }

        if step.is_done() {
            self.fetch_next(mission, now_ms);
        }
        Ok(())
    }

    /// Redirect execution toward the mission's initial cell.
    ///
    /// Takes effect when the in-flight controller completes; if execution
    /// has already finished, the detour starts immediately. Returns false
    /// while Idle.
    pub fn request_go_home(&mut self, mission: &Mission, now_ms: u64) -> bool {
        match self.state {
            RunState::Idle => false,
            RunState::ReturningHome => true,
            RunState::Executing => {
                self.state = RunState::ReturningHome;
                if self.finished {
                    self.finished = false;
                    self.fetch_next(mission, now_ms);
                }
                true
            }
        }
    }

    /// Fetch the next directive and install its step controller.
    fn fetch_next(&mut self, mission: &Mission, now_ms: u64) {
        let directive = match self.state {
            RunState::ReturningHome => self.plan.go_home(mission),
            _ => self.plan.next(mission, self.elapsed_ds(now_ms)),
        };

        self.step = match directive {
            Directive::Left => Some(Step::Turn(TurnStep::new(TurnDirection::Left))),
            Directive::Right => Some(Step::Turn(TurnStep::new(TurnDirection::Right))),
            Directive::Go => Some(Step::Go(GoStep::new())),
            Directive::Wait => Some(Step::Wait(WaitStep)),
            Directive::Finished => {
                self.finished = true;
                None
            }
        };
    }

    /// Mission time in deciseconds, saturating at the 15-bit time range.
    fn elapsed_ds(&self, now_ms: u64) -> u16 {
        let ds = now_ms.saturating_sub(self.started_at_ms) / 100;
        ds.min(u64::from(MAX_TIME_DS)) as u16
    }
}
