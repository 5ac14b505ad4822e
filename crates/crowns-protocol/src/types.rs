//! Core protocol types: identities, recipients, and the inbound actions.
//!
//! Everything a client can ask the engine to do is one of the four
//! [`Action`] variants — a closed set handled by an exhaustive `match`,
//! so there is no such thing as an "unknown action type" past the decode
//! boundary. The JSON shapes are internally tagged:
//!
//! ```json
//! { "type": "join",    "playerId": "p-1", "name": "Dinosaur" }
//! { "type": "draw",    "playerId": "p-1", "source": "deck" }
//! { "type": "discard", "playerId": "p-1", "card": "3♥" }
//! { "type": "goOut",   "playerId": "p-1" }
//! ```

use std::fmt;

use crowns_cards::Card;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity: an opaque stable string chosen by the transport
/// layer. The engine never inspects it, only compares it.
///
/// Newtype wrapper so a player id cannot be confused with a display name
/// or any other string floating around. `#[serde(transparent)]` keeps the
/// wire form a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a table (one game instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive an outbound event.
///
/// The engine returns `(Recipient, Event)` pairs; the table actor decides
/// which attached connections each one reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every attached player and observer.
    All,
    /// One specific player (e.g. the error for an invalid go-out).
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Which pile a draw takes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawSource {
    Deck,
    Discard,
}

impl fmt::Display for DrawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawSource::Deck => write!(f, "deck"),
            DrawSource::Discard => write!(f, "discard"),
        }
    }
}

/// An inbound player action — the engine's entire input language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Register with the game. Accepted in any phase before game over;
    /// the round starts once enough players have joined.
    #[serde(rename_all = "camelCase")]
    Join { player_id: PlayerId, name: String },

    /// Take the top card of the deck or the discard pile into hand.
    #[serde(rename_all = "camelCase")]
    Draw {
        player_id: PlayerId,
        source: DrawSource,
    },

    /// Move a card from hand onto the discard pile, ending the turn.
    #[serde(rename_all = "camelCase")]
    Discard { player_id: PlayerId, card: Card },

    /// Claim that the whole hand divides into melds, ending the round.
    #[serde(rename_all = "camelCase")]
    GoOut { player_id: PlayerId },
}

impl Action {
    /// The id of the player the action claims to come from.
    pub fn player_id(&self) -> &PlayerId {
        match self {
            Action::Join { player_id, .. }
            | Action::Draw { player_id, .. }
            | Action::Discard { player_id, .. }
            | Action::GoOut { player_id } => player_id,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
