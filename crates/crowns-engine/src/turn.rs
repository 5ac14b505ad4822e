//! Turn order: who plays after whom.

use crowns_protocol::PlayerId;
use serde::{Deserialize, Serialize};

/// The seat order for one round, captured from the join order at deal
/// time. Between deals it never changes — players joining mid-round wait
/// for the next capture (or forever, under a frozen-rotation policy).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation {
    seats: Vec<PlayerId>,
}

impl Rotation {
    pub fn new(seats: Vec<PlayerId>) -> Self {
        Self { seats }
    }

    /// The player who opens the round.
    pub fn first(&self) -> Option<&PlayerId> {
        self.seats.first()
    }

    /// The cyclic successor of `current`, or `None` if `current` holds no
    /// seat.
    pub fn next_after(&self, current: &PlayerId) -> Option<&PlayerId> {
        let at = self.seats.iter().position(|id| id == current)?;
        self.seats.get((at + 1) % self.seats.len())
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.seats.iter().any(|seat| seat == id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn abc() -> Rotation {
        Rotation::new(vec![pid("a"), pid("b"), pid("c")])
    }

    #[test]
    fn test_next_after_cycles_in_join_order() {
        let rot = abc();
        assert_eq!(rot.next_after(&pid("a")), Some(&pid("b")));
        assert_eq!(rot.next_after(&pid("b")), Some(&pid("c")));
        assert_eq!(rot.next_after(&pid("c")), Some(&pid("a")), "wraps around");
    }

    #[test]
    fn test_next_after_unseated_player_is_none() {
        let rot = abc();
        assert_eq!(rot.next_after(&pid("z")), None);
    }

    #[test]
    fn test_single_seat_rotation_cycles_to_itself() {
        let rot = Rotation::new(vec![pid("solo")]);
        assert_eq!(rot.next_after(&pid("solo")), Some(&pid("solo")));
    }

    #[test]
    fn test_first_is_the_earliest_joiner() {
        assert_eq!(abc().first(), Some(&pid("a")));
        assert_eq!(Rotation::default().first(), None);
    }
}
