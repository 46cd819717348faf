//! Values the machine hands out: the spin ticket, the settlement, the
//! renderer snapshot and the event stream vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Issued when a spin starts. Carries everything the renderer needs to
/// animate and everything the host needs to settle it later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinTicket {
    pub spin_id: u64,
    pub winner_index: usize,
    pub target_rotation_degrees: f64,
    pub started_at: DateTime<Utc>,
    pub spin_duration_ms: u64,
}

impl SpinTicket {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    /// Instant at which this spin is due to settle, or `None` if that lies
    /// beyond the representable range.
    pub fn settles_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.spin_duration_ms).ok()?;
        let duration = chrono::Duration::try_milliseconds(millis)?;
        self.started_at.checked_add_signed(duration)
    }
}

/// Outcome of a settled spin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub spin_id: u64,
    pub winner: String,
    pub winner_index: usize,
    /// Winner's total wins including this one.
    pub wins: u32,
}

/// Read-only view for the renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinSnapshot {
    pub current_rotation_degrees: f64,
    pub is_spinning: bool,
    pub spin_duration_ms: u64,
    pub winner_index: Option<usize>,
    pub winner_name: Option<String>,
    pub revealed: bool,
    pub participants: Vec<String>,
}

/// Discrete lifecycle notifications published by the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEvent {
    Started(SpinTicket),
    Settled(Settlement),
    Revealed { spin_id: u64, winner: String },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_settles_after_duration() {
        let started_at = Utc::now();
        let ticket = SpinTicket {
            spin_id: 0,
            winner_index: 1,
            target_rotation_degrees: 1890.0,
            started_at,
            spin_duration_ms: 5500,
        };

        assert_eq!(ticket.duration(), Duration::from_millis(5500));
        assert_eq!(
            ticket.settles_at().unwrap() - started_at,
            chrono::Duration::milliseconds(5500)
        );
    }

    #[test]
    fn huge_duration_has_no_settle_instant() {
        let ticket = SpinTicket {
            spin_id: 0,
            winner_index: 0,
            target_rotation_degrees: 1800.0,
            started_at: Utc::now(),
            spin_duration_ms: u64::MAX,
        };
        assert_eq!(ticket.settles_at(), None);

        let ticket = SpinTicket {
            spin_duration_ms: i64::MAX as u64,
            ..ticket
        };
        assert_eq!(ticket.settles_at(), None);
    }

    #[test]
    fn events_are_tagged_for_consumers() {
        let event = SpinEvent::Revealed {
            spin_id: 3,
            winner: "B".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "revealed");
        assert_eq!(json["winner"], "B");

        let reset = serde_json::to_value(SpinEvent::Reset).unwrap();
        assert_eq!(reset["type"], "reset");
    }
}
