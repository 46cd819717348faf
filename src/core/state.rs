//! Spin lifecycle states.
//!
//! The lifecycle is a cycle with no terminal state:
//! `Idle -> Spinning -> Settled -> Spinning -> ...`, with an explicit
//! reset taking `Settled` back to `Idle`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the wheel currently is in its spin cycle.
///
/// # Example
///
/// ```rust
/// use fairspin::core::SpinState;
///
/// let state = SpinState::default();
/// assert_eq!(state.name(), "Idle");
/// assert!(!state.is_spinning());
/// assert_eq!(state.winner_index(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SpinState {
    /// No spin has happened yet, or the last result was reset.
    #[default]
    Idle,

    /// A winner has been drawn and the wheel is turning toward it.
    Spinning {
        target_rotation_degrees: f64,
        started_at: DateTime<Utc>,
        winner_index: usize,
    },

    /// The wheel has stopped and the winner is published.
    Settled { winner: String, winner_index: usize },
}

impl SpinState {
    /// Name for display/logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Spinning { .. } => "Spinning",
            Self::Settled { .. } => "Settled",
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self, Self::Spinning { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }

    /// Index of the drawn winner, known from the moment the spin starts.
    pub fn winner_index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Spinning { winner_index, .. } | Self::Settled { winner_index, .. } => {
                Some(*winner_index)
            }
        }
    }

    /// Name of the winner, published only once the spin has settled.
    pub fn winner_name(&self) -> Option<&str> {
        match self {
            Self::Settled { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// Time spent spinning as of `now`. `None` unless spinning.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Self::Spinning { started_at, .. } => Some(
                now.signed_duration_since(*started_at)
                    .to_std()
                    .unwrap_or(Duration::ZERO),
            ),
            _ => None,
        }
    }
}
