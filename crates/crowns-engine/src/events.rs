//! Outbound events: everything the engine ever tells the outside world.
//!
//! These live next to [`GameState`] because the snapshot event carries
//! the whole state. Wire shapes are internally tagged JSON:
//!
//! ```json
//! { "type": "state",    "state": { ... } }
//! { "type": "endRound", "scores": { "Dinosaur": 26, "Sloth": 70 } }
//! { "type": "error",    "message": "Invalid hand to go out" }
//! { "type": "gameOver", "winner": "Sloth", "score": 412 }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// A server-to-client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// Full state snapshot, broadcast after every accepted mutation.
    State { state: GameState },

    /// This round's points per player (by display name), broadcast once
    /// per round transition.
    EndRound { scores: HashMap<String, u32> },

    /// Something only the acting player should hear — currently just
    /// rejected go-out attempts.
    Error { message: String },

    /// The final verdict after round eleven.
    GameOver { winner: String, score: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_round_json_format() {
        let event = Event::EndRound {
            scores: HashMap::from([("Dinosaur".to_string(), 26)]),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "endRound");
        assert_eq!(json["scores"]["Dinosaur"], 26);
    }

    #[test]
    fn test_error_json_format() {
        let event = Event::Error {
            message: "Invalid hand to go out".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "Invalid hand to go out");
    }

    #[test]
    fn test_game_over_json_format() {
        let event = Event::GameOver {
            winner: "Sloth".into(),
            score: 412,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "gameOver");
        assert_eq!(json["winner"], "Sloth");
        assert_eq!(json["score"], 412);
    }

    #[test]
    fn test_state_event_round_trips() {
        let event = Event::State {
            state: crate::state::GameState::new(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: Event = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
