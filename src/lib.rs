//! Fairspin: history-aware winner selection for prize wheels
//!
//! Fairspin picks a winner from a list of named participants, favouring
//! those who have won least, and tells a visual wheel exactly where to stop
//! so the animation lands on that winner.
//!
//! The crate follows a "pure core, imperative shell" layout. The core
//! (selection, rotation math, guards, state) is deterministic given its
//! random inputs. The shell ([`SpinCoordinator`]) owns the timer that turns
//! a spinning wheel into a settled result.
//!
//! # Core Concepts
//!
//! - **Weight**: `(max_wins - wins) + 1` per participant, so nobody is ever excluded
//! - **Ticket**: the target rotation and duration handed to the renderer when a spin starts
//! - **Rotation accumulator**: cumulative degrees that only ever move forward
//! - **Settlement**: the winner published, and credited, once the spin duration elapses
//!
//! # Example
//!
//! ```rust
//! use fairspin::builder::SpinMachineBuilder;
//! use fairspin::core::rotation::target_angle_mod_360;
//!
//! let mut machine = SpinMachineBuilder::new()
//!     .participants(["A", "B", "C"])
//!     .selection_random(|| 0.5)
//!     .jitter_random(|| 0.0)
//!     .build()
//!     .unwrap();
//!
//! let ticket = machine.request_spin().unwrap();
//! assert_eq!(ticket.winner_index, 1);
//! assert_eq!(ticket.target_rotation_degrees % 360.0, target_angle_mod_360(1, 3));
//!
//! // Normally a timer does this after `ticket.duration()`.
//! let settlement = machine.settle(ticket.spin_id).unwrap();
//! assert_eq!(settlement.winner, "B");
//! assert_eq!(machine.weights(), vec![2, 1, 2]);
//! ```

pub mod builder;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod machine;
pub mod selection;

// Re-export commonly used types
pub use config::SpinConfig;
pub use coordinator::SpinCoordinator;
pub use crate::core::{Participant, SpinRejected, SpinState, WinHistory};
pub use machine::{Settlement, SpinEvent, SpinMachine, SpinSnapshot, SpinTicket};
