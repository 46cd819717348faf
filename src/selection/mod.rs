//! History-aware weighted winner selection.
//!
//! Each participant's weight is `(max_wins - wins) + 1`: the fewer wins,
//! the heavier the weight, and nobody ever drops to zero. A single uniform
//! draw is then walked across the weights in roster order.
//!
//! Selection is pure apart from consuming one value from the random source.

pub mod random;

pub use random::{RandomSource, RngSource};

use crate::core::{Participant, WinHistory, MIN_PARTICIPANTS};
use thiserror::Error;
use tracing::warn;

/// Errors raised by [`select`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    #[error("Selection needs at least {required} participants, got {count}")]
    InvalidInput { count: usize, required: usize },
}

/// Selection weight of every participant, in roster order.
///
/// # Example
///
/// ```rust
/// use fairspin::core::{Participant, WinHistory};
/// use fairspin::selection::weights;
///
/// let roster: Vec<Participant> = ["A", "B", "C"]
///     .iter()
///     .map(|n| Participant::new(n).unwrap())
///     .collect();
///
/// let history: WinHistory = [("B".to_string(), 1)].into_iter().collect();
/// assert_eq!(weights(&roster, &history), vec![2, 1, 2]);
/// ```
pub fn weights(participants: &[Participant], history: &WinHistory) -> Vec<u64> {
    let wins: Vec<u32> = participants
        .iter()
        .map(|p| history.wins(p.name()))
        .collect();
    let max_wins = wins.iter().copied().max().unwrap_or(0);

    wins.iter()
        .map(|&w| u64::from(max_wins - w) + 1)
        .collect()
}

/// Walk `draw` across `weights` and return the first index where the
/// running remainder reaches zero.
///
/// Falls back to the last index when no weight absorbs the draw, which only
/// happens if `draw` is at or beyond the total weight (floating-point edge
/// cases or an out-of-contract source).
pub fn pick_index(weights: &[u64], draw: f64) -> usize {
    let mut remainder = draw;
    for (index, &weight) in weights.iter().enumerate() {
        remainder -= weight as f64;
        if remainder <= 0.0 {
            return index;
        }
    }

    let last = weights.len().saturating_sub(1);
    warn!(draw, last, "weighted draw not absorbed, falling back to last participant");
    last
}

/// Draw a winner index in `[0, participants.len())`.
///
/// Given a fixed value from `random`, the result is deterministic.
///
/// # Example
///
/// ```rust
/// use fairspin::core::{Participant, WinHistory};
/// use fairspin::selection::select;
///
/// let roster: Vec<Participant> = ["A", "B", "C"]
///     .iter()
///     .map(|n| Participant::new(n).unwrap())
///     .collect();
///
/// // Weights [1, 1, 1], draw 0.5 * 3 = 1.5 lands on B.
/// let winner = select(&roster, &WinHistory::new(), &mut || 0.5).unwrap();
/// assert_eq!(winner, 1);
/// ```
pub fn select<R>(
    participants: &[Participant],
    history: &WinHistory,
    random: &mut R,
) -> Result<usize, SelectionError>
where
    R: RandomSource + ?Sized,
{
    if participants.len() < MIN_PARTICIPANTS {
        return Err(SelectionError::InvalidInput {
            count: participants.len(),
            required: MIN_PARTICIPANTS,
        });
    }

    let weights = weights(participants, history);
    let total_weight: u64 = weights.iter().sum();
    let draw = random.next_unit() * total_weight as f64;

    Ok(pick_index(&weights, draw))
}
