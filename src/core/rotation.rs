//! Wheel geometry and the cumulative rotation carried across spins.
//!
//! Angles are in degrees. Segment `i` spans
//! `[i * span, (i + 1) * span)` under a fixed zero reference, and the
//! renderer draws its pointer at [`POINTER_REFERENCE_ANGLE`].

use serde::{Deserialize, Serialize};

/// Angle at which the renderer draws the pointer. Shared contract with the
/// renderer, not a tunable.
pub const POINTER_REFERENCE_ANGLE: f64 = 270.0;

const FULL_TURN: f64 = 360.0;

/// Angular size of one segment on a wheel of `participant_count` segments.
pub fn segment_span(participant_count: usize) -> f64 {
    FULL_TURN / participant_count as f64
}

/// Angle of the center of segment `winner_index`.
pub fn winner_center_angle(winner_index: usize, participant_count: usize) -> f64 {
    let span = segment_span(participant_count);
    winner_index as f64 * span + span / 2.0
}

/// Resting orientation in `[0, 360)` that puts the winner's center under
/// the pointer.
///
/// # Example
///
/// ```rust
/// use fairspin::core::rotation::target_angle_mod_360;
///
/// // Three segments, winner at index 1: center is 180°, so the wheel rests at 90°.
/// assert_eq!(target_angle_mod_360(1, 3), 90.0);
/// ```
pub fn target_angle_mod_360(winner_index: usize, participant_count: usize) -> f64 {
    (POINTER_REFERENCE_ANGLE - winner_center_angle(winner_index, participant_count) + FULL_TURN)
        .rem_euclid(FULL_TURN)
}

/// Cumulative visual rotation in degrees, never wrapped and never reduced.
///
/// Only the owning machine advances it; the renderer reads
/// [`degrees`](Self::degrees) and animates toward it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationAccumulator {
    degrees: f64,
}

impl RotationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Whole turns completed so far.
    pub fn full_turns(&self) -> f64 {
        (self.degrees / FULL_TURN).floor()
    }

    /// Compute the next target for `winner_index` without committing it.
    ///
    /// `extra_turns` whole turns are added on top of the turns already
    /// completed, with a floor of one, so the result is strictly ahead of
    /// the current rotation and lands exactly on the winner.
    pub fn target_for(
        &self,
        winner_index: usize,
        participant_count: usize,
        extra_turns: u32,
    ) -> f64 {
        (self.full_turns() + f64::from(extra_turns.max(1))) * FULL_TURN
            + target_angle_mod_360(winner_index, participant_count)
    }

    /// Commit the next target for `winner_index` and return it.
    pub(crate) fn advance(
        &mut self,
        winner_index: usize,
        participant_count: usize,
        extra_turns: u32,
    ) -> f64 {
        self.degrees = self.target_for(winner_index, participant_count, extra_turns);
        self.degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_math_for_three_participants() {
        assert_eq!(segment_span(3), 120.0);
        assert_eq!(winner_center_angle(0, 3), 60.0);
        assert_eq!(winner_center_angle(1, 3), 180.0);
        assert_eq!(winner_center_angle(2, 3), 300.0);
    }

    #[test]
    fn target_angle_is_normalized() {
        // 270 - 300 + 360 = 330
        assert_eq!(target_angle_mod_360(2, 3), 330.0);
        // 270 - 60 + 360 = 570 -> 210
        assert_eq!(target_angle_mod_360(0, 3), 210.0);
        for count in 2..40 {
            for index in 0..count {
                let angle = target_angle_mod_360(index, count);
                assert!((0.0..360.0).contains(&angle), "{angle} for {index}/{count}");
            }
        }
    }

    #[test]
    fn target_builds_on_completed_turns() {
        let mut rotation = RotationAccumulator::new();
        let first = rotation.advance(1, 3, 5);
        assert_eq!(first, 5.0 * 360.0 + 90.0);

        let second = rotation.target_for(0, 3, 5);
        assert_eq!(second, 10.0 * 360.0 + 210.0);
        assert_eq!(rotation.degrees(), first);
        assert_eq!(rotation.advance(0, 3, 5), second);
    }

    #[test]
    fn zero_extra_turns_still_moves_forward() {
        let mut rotation = RotationAccumulator::new();
        // Segment C of three rests at 330°, segment B at 90°.
        let first = rotation.advance(2, 3, 0);
        assert_eq!(first, 360.0 + 330.0);

        let second = rotation.advance(1, 3, 0);
        assert!(second > first);
        assert_eq!(second, 2.0 * 360.0 + 90.0);
        assert_eq!(rotation.full_turns(), 2.0);
    }
}
