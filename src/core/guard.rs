//! Guards that decide whether a spin request may start.
//!
//! Guards are pure: they look at the current state and roster size and
//! report every rule that is violated, using Stillwater's `Validation` to
//! accumulate failures instead of stopping at the first one.

use super::state::SpinState;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Minimum roster size for a draw to make sense.
pub const MIN_PARTICIPANTS: usize = 2;

/// A single reason a spin request was turned away.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpinRejection {
    #[error("A spin is already in progress")]
    Busy,

    #[error("At least {required} participants are needed (have {count})")]
    NotEnoughParticipants { count: usize, required: usize },
}

/// A rejected spin request with every violated rule.
///
/// Rejection is an expected outcome, not a fault: nothing was mutated.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Spin request rejected: {}", Reasons(.reasons))]
pub struct SpinRejected {
    pub reasons: Vec<SpinRejection>,
}

impl SpinRejected {
    /// Rejected because another spin is still running.
    pub fn is_busy(&self) -> bool {
        self.reasons.contains(&SpinRejection::Busy)
    }

    /// Rejected because the roster is too small.
    pub fn is_under_populated(&self) -> bool {
        self.reasons
            .iter()
            .any(|r| matches!(r, SpinRejection::NotEnoughParticipants { .. }))
    }
}

struct Reasons<'a>(&'a [SpinRejection]);

impl fmt::Display for Reasons<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Rules evaluated before every spin.
///
/// # Example
///
/// ```rust
/// use fairspin::core::{SpinRules, SpinState};
///
/// let rules = SpinRules::default();
/// assert!(rules.check(&SpinState::Idle, 3).is_ok());
///
/// let rejected = rules.check(&SpinState::Idle, 1).unwrap_err();
/// assert!(rejected.is_under_populated());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinRules {
    min_participants: usize,
}

impl Default for SpinRules {
    fn default() -> Self {
        Self {
            min_participants: MIN_PARTICIPANTS,
        }
    }
}

impl SpinRules {
    /// Require at least `min_participants`, never fewer than two.
    pub fn with_min_participants(min_participants: usize) -> Self {
        Self {
            min_participants: min_participants.max(MIN_PARTICIPANTS),
        }
    }

    pub fn min_participants(&self) -> usize {
        self.min_participants
    }

    /// Evaluate every rule, accumulating ALL violations.
    pub fn enforce(
        &self,
        state: &SpinState,
        participant_count: usize,
    ) -> Validation<(), NonEmptyVec<SpinRejection>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<SpinRejection>>> = Vec::new();

        let not_busy = if state.is_spinning() {
            Validation::fail(SpinRejection::Busy)
        } else {
            Validation::success(())
        };
        checks.push(not_busy);

        let populated = if participant_count < self.min_participants {
            Validation::fail(SpinRejection::NotEnoughParticipants {
                count: participant_count,
                required: self.min_participants,
            })
        } else {
            Validation::success(())
        };
        checks.push(populated);

        Validation::all_vec(checks).map(|_| ())
    }

    /// Evaluate every rule and fold the outcome into a `Result`.
    pub fn check(&self, state: &SpinState, participant_count: usize) -> Result<(), SpinRejected> {
        match self.enforce(state, participant_count) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(SpinRejected {
                reasons: errors.iter().cloned().collect(),
            }),
        }
    }
}
