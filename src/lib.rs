//! grid_trail - Waypoint autopilot core for a line-following grid vehicle
//!
//! This crate contains the platform-agnostic logic that steers a small
//! differential-drive robot across a ruled 9x9 grid using only five
//! line-presence sensors and a pair of signed-percentage motor channels.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies outside of tests
//! - **Trait abstractions**: Time, motors and slot storage injected via traits
//! - **Tick-driven**: Every state machine is a non-blocking poll advanced by
//!   the caller; nothing blocks or suspends
//!
//! # Modules
//!
//! - [`geometry`]: Headings, grid cells, poses and rotation helpers
//! - [`sensor`]: The five-bit line sensor sample contract
//! - [`motor`]: Drive motor and drivetrain abstractions
//! - [`traits`]: Platform service traits (TimeSource, SlotMedium) with mocks
//! - [`mission`]: Packed waypoint codec, mission text parser, plan engine
//!   and the active/staging/slot persistence gateway
//! - [`control`]: Closed-loop step controllers and the execution orchestrator

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod geometry;
pub mod mission;
pub mod motor;
pub mod sensor;
pub mod traits;
