//! Per-participant win tracking.
//!
//! Win history drives the fairness weighting: the fewer times a participant
//! has won, the heavier their weight on the next draw. Only the owning
//! machine mutates it; everyone else gets a read-only view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from participant name to the number of draws they have won.
///
/// Every active participant has an entry (zero on insertion) and entries for
/// removed participants are deleted. Mutation is crate-private so the
/// invariant can only be touched through [`SpinMachine`](crate::machine::SpinMachine).
///
/// # Example
///
/// ```rust
/// use fairspin::core::WinHistory;
///
/// let history = WinHistory::new();
/// assert_eq!(history.wins("Alice"), 0);
/// assert_eq!(history.total_wins(), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinHistory {
    wins: BTreeMap<String, u32>,
}

impl WinHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wins recorded for `name`, or zero if unknown.
    pub fn wins(&self, name: &str) -> u32 {
        self.wins.get(name).copied().unwrap_or(0)
    }

    /// Whether `name` has an entry, even a zero one.
    pub fn contains(&self, name: &str) -> bool {
        self.wins.contains_key(name)
    }

    /// Sum of all recorded wins. Equals the number of completed draws as
    /// long as no winner has since been removed.
    pub fn total_wins(&self) -> u64 {
        self.wins.values().map(|&w| u64::from(w)).sum()
    }

    /// Highest win count in the history, or zero when empty.
    pub fn max_wins(&self) -> u32 {
        self.wins.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.wins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.wins.iter().map(|(name, &wins)| (name.as_str(), wins))
    }

    /// Ensure an entry exists for `name`, leaving an existing count intact.
    pub(crate) fn ensure(&mut self, name: &str) {
        self.wins.entry(name.to_string()).or_insert(0);
    }

    /// Delete the entry for `name`, returning its count if there was one.
    pub(crate) fn remove(&mut self, name: &str) -> Option<u32> {
        self.wins.remove(name)
    }

    /// Credit one win to `name`, returning the new count.
    pub(crate) fn record_win(&mut self, name: &str) -> u32 {
        let entry = self.wins.entry(name.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

impl FromIterator<(String, u32)> for WinHistory {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            wins: iter.into_iter().collect(),
        }
    }
}
