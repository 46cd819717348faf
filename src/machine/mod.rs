//! Spin state machine: the synchronous heart of a wheel session.
//!
//! # Key Concepts
//!
//! - **Machine**: owns roster, history, rotation and lifecycle state
//! - **Ticket**: issued when a spin starts, redeemed to settle it
//! - **Snapshot**: the read-only view a renderer draws from
//!
//! Time is injected. The machine is driven either by an async host that
//! owns a timer or by a loop that calls `poll` with the current instant.

mod spin;
mod ticket;

pub use spin::SpinMachine;
pub use ticket::{Settlement, SpinEvent, SpinSnapshot, SpinTicket};
