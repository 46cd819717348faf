//! Async host for a [`SpinMachine`].
//!
//! This is the imperative shell around the machine: it owns the settlement
//! timer, publishes snapshots for the renderer and lifecycle events for the
//! presentation layer, and cancels everything when torn down.
//!
//! # Example
//!
//! ```rust
//! use fairspin::builder::SpinMachineBuilder;
//! use fairspin::SpinEvent;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let coordinator = SpinMachineBuilder::new()
//!     .participants(["A", "B", "C"])
//!     .selection_random(|| 0.5)
//!     .build_coordinator()
//!     .unwrap();
//! let mut events = coordinator.events();
//!
//! let ticket = coordinator.request_spin().unwrap();
//! assert_eq!(ticket.winner_index, 1);
//!
//! assert!(matches!(events.recv().await, Ok(SpinEvent::Started(_))));
//! match events.recv().await {
//!     Ok(SpinEvent::Settled(settlement)) => assert_eq!(settlement.winner, "B"),
//!     other => panic!("unexpected event: {other:?}"),
//! }
//! # }
//! ```

use crate::builder::BuildError;
use crate::core::{Participant, RosterError, SpinRejected, WinHistory};
use crate::machine::{Settlement, SpinEvent, SpinMachine, SpinSnapshot, SpinTicket};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

const EVENT_CAPACITY: usize = 32;

/// Timer task for the spin that is running or awaiting its reveal.
struct PendingSpin {
    spin_id: u64,
    handle: JoinHandle<()>,
}

struct Shared {
    machine: Mutex<SpinMachine>,
    pending: Mutex<Option<PendingSpin>>,
    snapshots: watch::Sender<SpinSnapshot>,
    events: broadcast::Sender<SpinEvent>,
}

impl Shared {
    fn machine(&self) -> MutexGuard<'_, SpinMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, Option<PendingSpin>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, machine: &SpinMachine) {
        self.snapshots.send_replace(machine.snapshot());
    }

    fn emit(&self, event: SpinEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn settle(&self, spin_id: u64) -> Option<Settlement> {
        let settlement = {
            let mut machine = self.machine();
            let settlement = machine.settle(spin_id)?;
            self.publish(&machine);
            settlement
        };
        self.emit(SpinEvent::Settled(settlement.clone()));
        Some(settlement)
    }

    fn reveal(&self, spin_id: u64, winner: String) {
        {
            let mut machine = self.machine();
            if !machine.reveal(spin_id) {
                return;
            }
            self.publish(&machine);
        }
        self.emit(SpinEvent::Revealed { spin_id, winner });
    }

    fn finish(&self, spin_id: u64) {
        let mut pending = self.pending();
        if pending.as_ref().is_some_and(|p| p.spin_id == spin_id) {
            *pending = None;
        }
    }

    fn cancel_pending(&self) {
        cancel(&mut self.pending());
    }
}

fn cancel(pending: &mut Option<PendingSpin>) {
    if let Some(previous) = pending.take() {
        debug!(spin_id = previous.spin_id, "cancelling spin timer");
        previous.handle.abort();
    }
}

/// Runs spins on a tokio runtime: settles each spin once its duration has
/// elapsed and reveals the result after the configured delay.
///
/// Dropping the coordinator cancels any pending timer, so a torn-down
/// session never mutates history.
pub struct SpinCoordinator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl SpinCoordinator {
    /// Wrap `machine`, scheduling timers on the current tokio runtime.
    pub fn new(machine: SpinMachine) -> Result<Self, BuildError> {
        let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;
        Ok(Self::with_runtime(machine, runtime))
    }

    /// Wrap `machine`, scheduling timers on `runtime`.
    pub fn with_runtime(machine: SpinMachine, runtime: Handle) -> Self {
        let (snapshots, _) = watch::channel(machine.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                machine: Mutex::new(machine),
                pending: Mutex::new(None),
                snapshots,
                events,
            }),
            runtime,
        }
    }

    /// Draw a winner and start a spin.
    ///
    /// Returns immediately after scheduling settlement. Rejected, with no
    /// effect, while a spin is running or when fewer than two participants
    /// are on the roster.
    pub fn request_spin(&self) -> Result<SpinTicket, SpinRejected> {
        // Lock order: pending, then machine. Holding `pending` until the new
        // timer is stored keeps `shutdown` from slipping in between.
        let mut pending = self.shared.pending();
        let (ticket, reveal_delay) = {
            let mut machine = self.shared.machine();
            let ticket = machine.request_spin()?;
            self.shared.publish(&machine);
            (ticket, machine.config().reveal_delay())
        };

        // A previous spin may still be waiting to reveal; its result is stale.
        cancel(&mut pending);
        self.shared.emit(SpinEvent::Started(ticket.clone()));
        *pending = Some(self.schedule(&ticket, reveal_delay));
        Ok(ticket)
    }

    fn schedule(&self, ticket: &SpinTicket, reveal_delay: Duration) -> PendingSpin {
        let spin_id = ticket.spin_id;
        let spin_duration = ticket.duration();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(spin_duration).await;
            let Some(settlement) = weak.upgrade().and_then(|shared| shared.settle(spin_id))
            else {
                return;
            };

            tokio::time::sleep(reveal_delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.reveal(spin_id, settlement.winner);
                shared.finish(spin_id);
            }
        });

        PendingSpin { spin_id, handle }
    }

    /// Cancel any pending settlement or reveal.
    ///
    /// A spin interrupted this way is abandoned: nobody is credited and the
    /// wheel returns to `Idle`, so the coordinator stays usable.
    pub fn shutdown(&self) {
        let mut pending = self.shared.pending();
        cancel(&mut pending);
        let mut machine = self.shared.machine();
        if machine.abandon() {
            self.shared.publish(&machine);
        }
    }

    /// Return a settled wheel to `Idle`.
    pub fn reset(&self) -> Result<(), SpinRejected> {
        let mut pending = self.shared.pending();
        {
            let mut machine = self.shared.machine();
            machine.reset()?;
            self.shared.publish(&machine);
        }
        cancel(&mut pending);
        drop(pending);
        self.shared.emit(SpinEvent::Reset);
        Ok(())
    }

    /// Hide a revealed result, e.g. when the winner dialog is closed.
    pub fn dismiss_reveal(&self) {
        let mut machine = self.shared.machine();
        machine.dismiss_reveal();
        self.shared.publish(&machine);
    }

    pub fn add_participant(&self, name: impl AsRef<str>) -> Result<Participant, RosterError> {
        let mut machine = self.shared.machine();
        let participant = machine.add_participant(name)?;
        self.shared.publish(&machine);
        Ok(participant)
    }

    pub fn add_participants<I, S>(&self, names: I) -> Vec<Participant>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut machine = self.shared.machine();
        let added = machine.add_participants(names);
        if !added.is_empty() {
            self.shared.publish(&machine);
        }
        added
    }

    pub fn remove_participant(&self, name: &str) -> Result<Participant, RosterError> {
        let mut machine = self.shared.machine();
        let removed = machine.remove_participant(name)?;
        self.shared.publish(&machine);
        Ok(removed)
    }

    pub fn remove_at(&self, index: usize) -> Result<Participant, RosterError> {
        let mut machine = self.shared.machine();
        let removed = machine.remove_at(index)?;
        self.shared.publish(&machine);
        Ok(removed)
    }

    /// Latest renderer view.
    pub fn snapshot(&self) -> SpinSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Follow renderer snapshots as they change.
    pub fn subscribe(&self) -> watch::Receiver<SpinSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Follow lifecycle events. Only events sent after this call are seen.
    pub fn events(&self) -> broadcast::Receiver<SpinEvent> {
        self.shared.events.subscribe()
    }

    pub fn is_spinning(&self) -> bool {
        self.shared.machine().is_spinning()
    }

    pub fn current_rotation_degrees(&self) -> f64 {
        self.shared.machine().current_rotation_degrees()
    }

    pub fn spin_duration_ms(&self) -> u64 {
        self.shared.machine().spin_duration_ms()
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.shared.machine().winner_index()
    }

    pub fn winner_name(&self) -> Option<String> {
        self.shared.machine().winner_name().map(str::to_string)
    }

    pub fn history(&self) -> WinHistory {
        self.shared.machine().history().clone()
    }

    pub fn completed_spins(&self) -> u64 {
        self.shared.machine().completed_spins()
    }

    /// Read-only access to the underlying machine.
    pub fn inspect<R>(&self, f: impl FnOnce(&SpinMachine) -> R) -> R {
        f(&self.shared.machine())
    }
}

impl Drop for SpinCoordinator {
    fn drop(&mut self) {
        self.shared.cancel_pending();
    }
}
