//! Synchronous spin state machine.

use crate::config::{ConfigError, SpinConfig};
use crate::core::{
    Participant, Roster, RosterError, RotationAccumulator, SpinRejected, SpinRejection,
    SpinRules, SpinState, WinHistory,
};
use crate::machine::ticket::{Settlement, SpinSnapshot, SpinTicket};
use crate::selection::{self, RandomSource, RngSource};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Owns the roster, win history, rotation and lifecycle state of one wheel.
///
/// The machine never sleeps or schedules anything itself. Hosts either call
/// [`settle`](Self::settle) when their own timer fires or drive time through
/// [`poll`](Self::poll). [`SpinCoordinator`](crate::SpinCoordinator) is the
/// async host shipped with this crate.
pub struct SpinMachine {
    roster: Roster,
    history: WinHistory,
    state: SpinState,
    rotation: RotationAccumulator,
    rules: SpinRules,
    config: SpinConfig,
    selection_random: Box<dyn RandomSource>,
    jitter_random: Box<dyn RandomSource>,
    next_spin_id: u64,
    current_spin: Option<u64>,
    completed_spins: u64,
    revealed: bool,
}

impl Default for SpinMachine {
    fn default() -> Self {
        Self::assemble(
            SpinConfig::default(),
            Box::new(RngSource::from_entropy()),
            Box::new(RngSource::from_entropy()),
        )
    }
}

impl SpinMachine {
    /// Create an idle machine with an empty roster and OS-seeded randomness.
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: SpinConfig) -> Result<Self, ConfigError> {
        Self::with_random(
            config,
            Box::new(RngSource::from_entropy()),
            Box::new(RngSource::from_entropy()),
        )
    }

    /// Create an idle machine with explicit random sources for the winner
    /// draw and for the cosmetic turn count.
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_random(
        config: SpinConfig,
        selection_random: Box<dyn RandomSource>,
        jitter_random: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, selection_random, jitter_random))
    }

    fn assemble(
        config: SpinConfig,
        selection_random: Box<dyn RandomSource>,
        jitter_random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            roster: Roster::new(),
            history: WinHistory::new(),
            state: SpinState::Idle,
            rotation: RotationAccumulator::new(),
            rules: SpinRules::default(),
            config,
            selection_random,
            jitter_random,
            next_spin_id: 0,
            current_spin: None,
            completed_spins: 0,
            revealed: false,
        }
    }

    pub(crate) fn set_rules(&mut self, rules: SpinRules) {
        self.rules = rules;
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn history(&self) -> &WinHistory {
        &self.history
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn participants(&self) -> &[Participant] {
        self.roster.as_slice()
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn current_rotation_degrees(&self) -> f64 {
        self.rotation.degrees()
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    pub fn spin_duration_ms(&self) -> u64 {
        self.config.spin_duration_ms
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.state.winner_index()
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.state.winner_name()
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Id of the spin that is running or last settled.
    pub fn current_spin_id(&self) -> Option<u64> {
        self.current_spin
    }

    pub fn completed_spins(&self) -> u64 {
        self.completed_spins
    }

    /// Current selection weights, in roster order.
    pub fn weights(&self) -> Vec<u64> {
        selection::weights(self.roster.as_slice(), &self.history)
    }

    pub fn snapshot(&self) -> SpinSnapshot {
        SpinSnapshot {
            current_rotation_degrees: self.rotation.degrees(),
            is_spinning: self.state.is_spinning(),
            spin_duration_ms: self.config.spin_duration_ms,
            winner_index: self.state.winner_index(),
            winner_name: self.state.winner_name().map(str::to_string),
            revealed: self.revealed,
            participants: self.roster.names(),
        }
    }

    /// Start a spin now. See [`request_spin_at`](Self::request_spin_at).
    pub fn request_spin(&mut self) -> Result<SpinTicket, SpinRejected> {
        self.request_spin_at(Utc::now())
    }

    /// Draw a winner and start spinning toward it.
    ///
    /// Rejected without touching any state while a spin is running or when
    /// the roster has fewer than two participants.
    pub fn request_spin_at(&mut self, now: DateTime<Utc>) -> Result<SpinTicket, SpinRejected> {
        if let Err(rejected) = self.rules.check(&self.state, self.roster.len()) {
            debug!(reasons = ?rejected.reasons, "spin request rejected");
            return Err(rejected);
        }

        let count = self.roster.len();
        let winner_index = selection::select(
            self.roster.as_slice(),
            &self.history,
            self.selection_random.as_mut(),
        )
        .map_err(|_| SpinRejected {
            reasons: vec![SpinRejection::NotEnoughParticipants {
                count,
                required: self.rules.min_participants(),
            }],
        })?;

        let extra_turns = self.config.extra_turns(self.jitter_random.next_unit());
        let target = self.rotation.advance(winner_index, count, extra_turns);

        let spin_id = self.next_spin_id;
        self.next_spin_id += 1;
        self.current_spin = Some(spin_id);
        self.revealed = false;
        self.state = SpinState::Spinning {
            target_rotation_degrees: target,
            started_at: now,
            winner_index,
        };

        debug!(
            spin_id,
            winner_index,
            extra_turns,
            target_rotation_degrees = target,
            "spin started"
        );

        Ok(SpinTicket {
            spin_id,
            winner_index,
            target_rotation_degrees: target,
            started_at: now,
            spin_duration_ms: self.config.spin_duration_ms,
        })
    }

    /// Finish spin `spin_id`: publish the winner and credit their win.
    ///
    /// Returns `None` when that spin is not the one currently running,
    /// which makes stale or duplicate timer callbacks harmless.
    pub fn settle(&mut self, spin_id: u64) -> Option<Settlement> {
        let SpinState::Spinning { winner_index, .. } = self.state else {
            warn!(spin_id, state = self.state.name(), "settle ignored, not spinning");
            return None;
        };
        if self.current_spin != Some(spin_id) {
            warn!(spin_id, current = ?self.current_spin, "settle ignored, stale spin");
            return None;
        }

        let Some(winner) = self.roster.get(winner_index).map(|p| p.name().to_string()) else {
            warn!(spin_id, winner_index, "winner vanished from roster, returning to idle");
            self.state = SpinState::Idle;
            self.current_spin = None;
            return None;
        };

        let wins = self.history.record_win(&winner);
        self.completed_spins += 1;
        self.state = SpinState::Settled {
            winner: winner.clone(),
            winner_index,
        };

        info!(spin_id, winner = %winner, winner_index, wins, "spin settled");

        Some(Settlement {
            spin_id,
            winner,
            winner_index,
            wins,
        })
    }

    /// Settle the running spin if its duration has elapsed by `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<Settlement> {
        let elapsed = self.state.elapsed(now)?;
        if elapsed < self.config.spin_duration() {
            return None;
        }
        let spin_id = self.current_spin?;
        self.settle(spin_id)
    }

    /// Mark the settled result of `spin_id` as revealed to the audience.
    ///
    /// Returns `true` only on the first reveal of the current result.
    pub fn reveal(&mut self, spin_id: u64) -> bool {
        if !self.state.is_settled() || self.current_spin != Some(spin_id) || self.revealed {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Hide a revealed result without clearing it.
    pub fn dismiss_reveal(&mut self) {
        self.revealed = false;
    }

    /// Return a settled wheel to `Idle`. Rejected while spinning.
    pub fn reset(&mut self) -> Result<(), SpinRejected> {
        if self.state.is_spinning() {
            return Err(SpinRejected {
                reasons: vec![SpinRejection::Busy],
            });
        }
        self.state = SpinState::Idle;
        self.current_spin = None;
        self.revealed = false;
        Ok(())
    }

    /// Stop a running spin without crediting anyone.
    ///
    /// The wheel returns to `Idle` and keeps its rotation. Returns `false`
    /// when no spin was running.
    pub fn abandon(&mut self) -> bool {
        if !self.state.is_spinning() {
            return false;
        }
        warn!(spin_id = ?self.current_spin, "spin abandoned before settling");
        self.state = SpinState::Idle;
        self.current_spin = None;
        self.revealed = false;
        true
    }

    /// Add one participant and give them an empty win record.
    pub fn add_participant(&mut self, name: impl AsRef<str>) -> Result<Participant, RosterError> {
        if self.state.is_spinning() {
            return Err(RosterError::Locked);
        }
        let participant = Participant::with_limit(name, self.config.max_name_len)?;
        self.roster.push(participant.clone())?;
        self.history.ensure(participant.name());
        self.clear_settled();
        debug!(participant = participant.name(), "participant added");
        Ok(participant)
    }

    /// Add many participants, e.g. one per line of an uploaded list.
    ///
    /// Blank, over-long and duplicate names are skipped. Returns the
    /// participants that were actually added.
    pub fn add_participants<I, S>(&mut self, names: I) -> Vec<Participant>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| match self.add_participant(name) {
                Ok(participant) => Some(participant),
                Err(err) => {
                    debug!(error = %err, "participant skipped");
                    None
                }
            })
            .collect()
    }

    /// Remove a participant by name and delete their win record.
    pub fn remove_participant(&mut self, name: &str) -> Result<Participant, RosterError> {
        if self.state.is_spinning() {
            return Err(RosterError::Locked);
        }
        let removed = self.roster.remove(name)?;
        self.forget(&removed);
        Ok(removed)
    }

    /// Remove the participant at `index` and delete their win record.
    pub fn remove_at(&mut self, index: usize) -> Result<Participant, RosterError> {
        if self.state.is_spinning() {
            return Err(RosterError::Locked);
        }
        let removed = self.roster.remove_at(index)?;
        self.forget(&removed);
        Ok(removed)
    }

    fn forget(&mut self, removed: &Participant) {
        self.history.remove(removed.name());
        self.clear_settled();
        debug!(participant = removed.name(), "participant removed");
    }

    // Any roster change resizes every segment, so a settled winner index
    // no longer sits under the pointer.
    fn clear_settled(&mut self) {
        if let SpinState::Settled { .. } = self.state {
            self.state = SpinState::Idle;
            self.current_spin = None;
            self.revealed = false;
        }
    }
}
