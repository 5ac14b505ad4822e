//! The shared game state: players, piles, and whose turn it is.
//!
//! `GameState` doubles as the broadcast snapshot — after every accepted
//! mutation the whole thing goes out to every attached connection, so
//! observers always see one complete, self-consistent view and never a
//! partial delta.

use std::collections::HashMap;

use crowns_cards::{Card, Deck, DiscardPile, Rank};
use crowns_protocol::PlayerId;
use serde::{Deserialize, Serialize};

use crate::config::GamePhase;
use crate::turn::Rotation;

/// One registered player. Persists, score accumulating, from join until
/// the game ends; the hand is replaced wholesale at every deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
    pub hand: Vec<Card>,
}

impl Player {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            score: 0,
            hand: Vec::new(),
        }
    }
}

/// The complete state of one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 1..=11 while rounds remain; 12 once the final round has ended.
    pub round: u8,

    /// Lifecycle phase; drives which actions are accepted.
    pub phase: GamePhase,

    /// All registered players, keyed by id.
    pub players: HashMap<PlayerId, Player>,

    /// Ids in the order they joined. Fixes deal order, turn rotation, and
    /// the winner tie-break.
    pub join_order: Vec<PlayerId>,

    /// The face-down draw stack, rebuilt at every deal.
    pub deck: Deck,

    /// The face-up pile, restarted with one flipped card at every deal.
    pub discard: DiscardPile,

    /// Turn order captured at the most recent deal.
    pub rotation: Rotation,

    /// Holder of the turn. `Some` exactly while a round is in progress.
    pub current_player: Option<PlayerId>,

    /// The rank that is wild this round. `Some` exactly while a round is
    /// dealt (from round 1's deal through the end of round 11's scoring).
    pub wild_rank: Option<Rank>,
}

impl GameState {
    pub(crate) fn new() -> Self {
        Self {
            round: 1,
            phase: GamePhase::WaitingForPlayers,
            players: HashMap::new(),
            join_order: Vec::new(),
            deck: Deck::default(),
            discard: DiscardPile::new(),
            rotation: Rotation::default(),
            current_player: None,
            wild_rank: None,
        }
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Total cards across the deck, the discard pile, and every hand.
    ///
    /// Conservation check: from a deal until the round ends this always
    /// equals [`Deck::SIZE`] — cards only move, they are never created or
    /// destroyed mid-round.
    pub fn cards_in_play(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.players.values().map(|p| p.hand.len()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_waiting_and_empty() {
        let state = GameState::new();
        assert_eq!(state.round, 1);
        assert_eq!(state.phase, GamePhase::WaitingForPlayers);
        assert!(state.players.is_empty());
        assert!(state.current_player.is_none());
        assert!(state.wild_rank.is_none());
        assert_eq!(state.cards_in_play(), 0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let state = GameState::new();
        let json: serde_json::Value = serde_json::to_value(&state).unwrap();

        assert!(json.get("currentPlayer").is_some());
        assert!(json.get("wildRank").is_some());
        assert!(json.get("joinOrder").is_some());
        assert!(json.get("current_player").is_none());
    }

    #[test]
    fn test_snapshot_round_trips() {
        let mut state = GameState::new();
        let id = PlayerId::new("p-1");
        state.players.insert(id.clone(), Player::new("Dinosaur".into()));
        state.join_order.push(id);

        let bytes = serde_json::to_vec(&state).unwrap();
        let decoded: GameState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state, decoded);
    }
}
