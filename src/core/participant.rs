//! Participants and the ordered roster they live in.
//!
//! A participant is identified by its display name. The roster keeps the
//! order participants were added in, which is also the order of wheel
//! segments, and refuses duplicate names.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default upper bound on a participant name, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 20;

/// Errors raised when building or editing a roster.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RosterError {
    #[error("Participant name is empty")]
    EmptyName,

    #[error("Participant name '{name}' exceeds {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("Participant '{0}' is already on the roster")]
    Duplicate(String),

    #[error("Participant '{0}' is not on the roster")]
    NotFound(String),

    #[error("No participant at index {index} (roster has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Roster is locked while a spin is in progress")]
    Locked,
}

/// A named entrant. The name doubles as the key into win history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    /// Create a participant from a raw name using the default length limit.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fairspin::core::Participant;
    ///
    /// let alice = Participant::new("  Alice ").unwrap();
    /// assert_eq!(alice.name(), "Alice");
    /// assert!(Participant::new("   ").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, RosterError> {
        Self::with_limit(name, DEFAULT_MAX_NAME_LEN)
    }

    /// Create a participant, enforcing `max_len` characters after trimming.
    pub fn with_limit(name: impl AsRef<str>, max_len: usize) -> Result<Self, RosterError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if trimmed.chars().count() > max_len {
            return Err(RosterError::NameTooLong {
                name: trimmed.to_string(),
                max: max_len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Participant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered set of participants with unique names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name() == name)
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }

    pub fn names(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Append a participant. Names are compared exactly (case-sensitive).
    pub fn push(&mut self, participant: Participant) -> Result<(), RosterError> {
        if self.contains(participant.name()) {
            return Err(RosterError::Duplicate(participant.name().to_string()));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant by name, returning it.
    pub fn remove(&mut self, name: &str) -> Result<Participant, RosterError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        Ok(self.participants.remove(index))
    }

    /// Remove the participant at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<Participant, RosterError> {
        if index >= self.participants.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.participants.len(),
            });
        }
        Ok(self.participants.remove(index))
    }
}
