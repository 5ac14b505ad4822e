//! Game configuration and the round-lifecycle state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Whether players who join after the first deal ever hold the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LateJoinPolicy {
    /// The rotation is rebuilt from the full join order at every deal, so
    /// a late joiner sits out the round in progress and plays from the
    /// next one on.
    #[default]
    NextRound,

    /// The rotation freezes at the first deal. Late joiners are still
    /// dealt and scored each round, but never take a turn.
    FoundersOnly,
}

/// Configuration for one game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Players needed before the first round deals.
    pub min_players: usize,

    /// Hard cap on registered players. Clamped to 8 — the largest deal
    /// (13 cards each, round 11) must fit one 116-card deck.
    pub max_players: usize,

    /// What happens to players who join mid-game.
    pub late_join: LateJoinPolicy,

    /// Fixed RNG seed for the deck shuffle. `None` seeds from the OS;
    /// tests pin it for reproducible deals.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
            late_join: LateJoinPolicy::default(),
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GamePhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a game session.
///
/// ```text
/// WaitingForPlayers → Dealing → InProgress → RoundEnding ─→ Dealing
///                                                        └─→ GameOver
/// ```
///
/// - **WaitingForPlayers**: registering joins, not enough players yet.
/// - **Dealing**: deck rebuilt and shuffled, hands dealt, discard flipped.
/// - **InProgress**: the current player draws, discards, or goes out.
/// - **RoundEnding**: hands scored, totals updated, round advanced.
/// - **GameOver**: eleven rounds done; terminal.
///
/// `Dealing` and `RoundEnding` complete within a single action, so
/// observers only ever see the other three between actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    WaitingForPlayers,
    Dealing,
    InProgress,
    RoundEnding,
    GameOver,
}

impl GamePhase {
    /// Returns `true` if new players may still register. Unlike most
    /// lobby-style games, joining stays open mid-game — only the end of
    /// the game closes the door.
    pub fn accepts_joins(&self) -> bool {
        !matches!(self, Self::GameOver)
    }

    /// Returns `true` if a round is actively being played.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dealing | Self::InProgress | Self::RoundEnding)
    }

    /// Returns `true` once the game has finished for good.
    pub fn is_over(&self) -> bool {
        matches!(self, Self::GameOver)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    ///
    /// The machine is almost linear; the one branch is at `RoundEnding`,
    /// which either deals the next round or ends the game.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::WaitingForPlayers, Self::Dealing)
                | (Self::Dealing, Self::InProgress)
                | (Self::InProgress, Self::RoundEnding)
                | (Self::RoundEnding, Self::Dealing)
                | (Self::RoundEnding, Self::GameOver)
        )
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::Dealing => write!(f, "Dealing"),
            Self::InProgress => write!(f, "InProgress"),
            Self::RoundEnding => write!(f, "RoundEnding"),
            Self::GameOver => write!(f, "GameOver"),
        }
    }
}
