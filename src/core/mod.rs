//! Core wheel types and logic.
//!
//! This module contains the pure core of the wheel:
//! - Participants and the ordered roster
//! - Win history that drives the fairness weighting
//! - Spin lifecycle states and the guards in front of them
//! - Rotation geometry and the cumulative rotation accumulator
//!
//! Nothing in here sleeps, schedules or touches a clock on its own.

mod guard;
mod history;
pub mod participant;
pub mod rotation;
mod state;

pub use guard::{SpinRejected, SpinRejection, SpinRules, MIN_PARTICIPANTS};
pub use history::WinHistory;
pub use participant::{Participant, Roster, RosterError};
pub use rotation::{RotationAccumulator, POINTER_REFERENCE_ANGLE};
pub use state::SpinState;
