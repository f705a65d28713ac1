//! Drive motor abstraction
//!
//! Platform-independent traits for the two independently driven wheels.
//! Speeds are signed percentages (-100..=100, negative meaning reverse),
//! matching the contract of the underlying H-bridge drivers.
//!
//! [`DriveMotor`] covers a single wheel; [`Drivetrain`] is the seam the step
//! controllers actuate through and is usually backed by [`DiffDrive`], which
//! coordinates a left/right motor pair. [`MockDrive`] records every command
//! for host tests.

/// Errors from motor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Speed outside -100..=100
    InvalidSpeed,
    /// Underlying PWM/H-bridge hardware failed
    HardwareFault,
}

impl core::fmt::Display for MotorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MotorError::InvalidSpeed => write!(f, "speed outside -100..=100"),
            MotorError::HardwareFault => write!(f, "motor hardware fault"),
        }
    }
}

/// One wheel's motor channel.
pub trait DriveMotor {
    /// Set speed as a signed percentage, negative for reverse.
    ///
    /// # Errors
    ///
    /// `MotorError::InvalidSpeed` if `percent` is outside -100..=100,
    /// `MotorError::HardwareFault` if the driver rejects the command.
    fn set_percent(&mut self, percent: i8) -> Result<(), MotorError>;

    /// Stop the motor (coast).
    fn stop(&mut self) -> Result<(), MotorError>;
}

/// Both wheels commanded together.
///
/// Step controllers talk to this trait only, never to individual motors,
/// so a tick always leaves the drivetrain in a consistent left/right state.
pub trait Drivetrain {
    /// Command both channels in one call.
    fn set_speeds(&mut self, left: i8, right: i8) -> Result<(), MotorError>;

    /// Stop both channels.
    fn stop(&mut self) -> Result<(), MotorError>;
}

/// Differential drive built from two [`DriveMotor`] channels.
pub struct DiffDrive<M: DriveMotor> {
    left: M,
    right: M,
}

impl<M: DriveMotor> DiffDrive<M> {
    pub fn new(left: M, right: M) -> Self {
        Self { left, right }
    }
}

impl<M: DriveMotor> Drivetrain for DiffDrive<M> {
    fn set_speeds(&mut self, left: i8, right: i8) -> Result<(), MotorError> {
        self.left.set_percent(left)?;
        self.right.set_percent(right)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.left.stop()?;
        self.right.stop()?;
        Ok(())
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock drivetrain recording every command for test verification.
#[derive(Debug, Default)]
pub struct MockDrive {
    /// Every `set_speeds` call in order
    pub commands: heapless::Vec<(i8, i8), 256>,
    /// Number of `stop` calls
    pub stops: usize,
}

impl MockDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent speed command, if any.
    pub fn last_speeds(&self) -> Option<(i8, i8)> {
        self.commands.last().copied()
    }
}

impl Drivetrain for MockDrive {
    fn set_speeds(&mut self, left: i8, right: i8) -> Result<(), MotorError> {
        if !(-100..=100).contains(&left) || !(-100..=100).contains(&right) {
            return Err(MotorError::InvalidSpeed);
        }
        // Ring behaviour: drop oldest once full so long simulations keep going
        if self.commands.is_full() {
            self.commands.remove(0);
        }
        let _ = self.commands.push((left, right));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.stops += 1;
        if self.commands.is_full() {
            self.commands.remove(0);
        }
        let _ = self.commands.push((0, 0));
        Ok(())
    }
}
