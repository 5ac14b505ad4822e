//! The game session: one table's rule engine.
//!
//! `GameSession` owns a [`GameState`] and advances it one [`Action`] at a
//! time. It is synchronous and single-writer by construction — the table
//! actor feeds it actions strictly in sequence, so no action ever observes
//! a half-applied state and the engine needs no locks of its own.
//!
//! Every call to [`GameSession::apply`] says explicitly what happened:
//! `Accepted` with the events to broadcast, or `Rejected` with the reason
//! and an untouched state. Rejections are silent on the wire (except an
//! invalid go-out, which tells the actor), but never silent to the caller.

use std::collections::HashMap;

use crowns_cards::{Card, Deck, DiscardPile, Rank};
use crowns_protocol::{Action, DrawSource, PlayerId, Recipient};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, GamePhase, LateJoinPolicy};
use crate::events::Event;
use crate::meld;
use crate::score;
use crate::state::{GameState, Player};
use crate::turn::Rotation;

/// One round per rank in the play order; the wild rank walks through all
/// eleven.
const FINAL_ROUND: u8 = 11;

/// Dealing needs 13 cards per player in the last round plus the flipped
/// discard; eight seats is the most one 116-card deck can cover.
const MAX_SEATS: usize = 8;

// ---------------------------------------------------------------------------
// Action results
// ---------------------------------------------------------------------------

/// Why an action was refused. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("the game is already over")]
    GameFinished,

    #[error("player {0} is not registered")]
    UnknownPlayer(PlayerId),

    #[error("player {0} has already joined")]
    AlreadyJoined(PlayerId),

    #[error("no seats left")]
    TableFull,

    #[error("no round is in progress")]
    NoRoundInProgress,

    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("the {0} pile is empty")]
    EmptySource(DrawSource),

    #[error("card {0} is not in hand")]
    CardNotInHand(Card),

    #[error("hand does not divide into melds")]
    InvalidHand,
}

/// Whether an action changed the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted,
    Rejected(RejectReason),
}

/// What one `apply` call did: the outcome, plus the events to deliver.
/// Rejected actions usually carry no events; an invalid go-out carries
/// the error event for the acting player.
#[derive(Debug)]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub events: Vec<(Recipient, Event)>,
}

impl ActionResult {
    fn accepted(events: Vec<(Recipient, Event)>) -> Self {
        Self {
            outcome: ActionOutcome::Accepted,
            events,
        }
    }

    fn rejected(reason: RejectReason) -> Self {
        Self {
            outcome: ActionOutcome::Rejected(reason),
            events: Vec::new(),
        }
    }

    fn rejected_with(reason: RejectReason, events: Vec<(Recipient, Event)>) -> Self {
        Self {
            outcome: ActionOutcome::Rejected(reason),
            events,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Accepted)
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// The rule engine for one game.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameSession {
    pub fn new(mut config: GameConfig) -> Self {
        config.max_players = config.max_players.clamp(1, MAX_SEATS);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            state: GameState::new(),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Processes one action to completion.
    pub fn apply(&mut self, action: Action) -> ActionResult {
        match action {
            Action::Join { player_id, name } => self.join(player_id, name),
            Action::Draw { player_id, source } => self.draw(player_id, source),
            Action::Discard { player_id, card } => self.discard(player_id, card),
            Action::GoOut { player_id } => self.go_out(player_id),
        }
    }

    // -- Join ---------------------------------------------------------------

    fn join(&mut self, player_id: PlayerId, name: String) -> ActionResult {
        if self.state.phase.is_over() {
            return ActionResult::rejected(RejectReason::GameFinished);
        }
        if self.state.players.contains_key(&player_id) {
            return ActionResult::rejected(RejectReason::AlreadyJoined(player_id));
        }
        if self.state.players.len() >= self.config.max_players {
            return ActionResult::rejected(RejectReason::TableFull);
        }

        let name = if name.trim().is_empty() {
            format!("Player{}", self.state.players.len() + 1)
        } else {
            name
        };
        tracing::info!(player = %player_id, name = %name, "player joined");

        self.state.players.insert(player_id.clone(), Player::new(name));
        self.state.join_order.push(player_id);

        // First deal fires as soon as the table seats enough players.
        // Later joins register only; they are picked up at the next deal.
        if self.state.phase == GamePhase::WaitingForPlayers
            && self.state.players.len() >= self.config.min_players
        {
            self.deal_round();
        }

        ActionResult::accepted(vec![self.snapshot()])
    }

    // -- Draw / discard -----------------------------------------------------

    fn draw(&mut self, player_id: PlayerId, source: DrawSource) -> ActionResult {
        if let Err(reason) = self.expect_turn(&player_id) {
            return ActionResult::rejected(reason);
        }

        let card = match source {
            DrawSource::Deck => self.state.deck.draw(),
            DrawSource::Discard => self.state.discard.draw(),
        };
        let Some(card) = card else {
            return ActionResult::rejected(RejectReason::EmptySource(source));
        };

        self.state
            .players
            .get_mut(&player_id)
            .expect("the turn holder is registered")
            .hand
            .push(card);

        ActionResult::accepted(vec![self.snapshot()])
    }

    fn discard(&mut self, player_id: PlayerId, card: Card) -> ActionResult {
        if let Err(reason) = self.expect_turn(&player_id) {
            return ActionResult::rejected(reason);
        }

        let player = self
            .state
            .players
            .get_mut(&player_id)
            .expect("the turn holder is registered");
        let Some(at) = player.hand.iter().position(|held| *held == card) else {
            return ActionResult::rejected(RejectReason::CardNotInHand(card));
        };
        player.hand.remove(at);
        self.state.discard.discard(card);

        self.advance_turn();
        ActionResult::accepted(vec![self.snapshot()])
    }

    // -- Go out -------------------------------------------------------------

    fn go_out(&mut self, player_id: PlayerId) -> ActionResult {
        if let Err(reason) = self.expect_turn(&player_id) {
            return ActionResult::rejected(reason);
        }

        let wild = self
            .state
            .wild_rank
            .expect("a round in progress has a wild rank");
        let hand = &self.state.players[&player_id].hand;
        if !meld::is_valid_hand(hand, wild) {
            tracing::debug!(player = %player_id, "go-out rejected: hand does not divide into melds");
            // The round continues and the turn stays put; only the
            // claimant hears about the failure.
            return ActionResult::rejected_with(
                RejectReason::InvalidHand,
                vec![(
                    Recipient::Player(player_id),
                    Event::Error {
                        message: "Invalid hand to go out".into(),
                    },
                )],
            );
        }

        tracing::info!(player = %player_id, round = self.state.round, "player went out");
        self.end_round()
    }

    // -- Round lifecycle ----------------------------------------------------

    /// Builds a fresh shuffled deck, deals `round + 2` cards to every
    /// registered player in join order, flips the discard starter, and
    /// hands the turn to the rotation's first seat.
    fn deal_round(&mut self) {
        debug_assert!(self.state.phase.can_transition_to(GamePhase::Dealing));
        self.state.phase = GamePhase::Dealing;

        let wild = Rank::wild_for_round(self.state.round)
            .expect("dealt rounds stay within the rank order");
        self.state.wild_rank = Some(wild);

        match self.config.late_join {
            LateJoinPolicy::NextRound => {
                self.state.rotation = Rotation::new(self.state.join_order.clone());
            }
            LateJoinPolicy::FoundersOnly => {
                if self.state.rotation.is_empty() {
                    self.state.rotation = Rotation::new(self.state.join_order.clone());
                }
            }
        }

        let mut deck = Deck::standard();
        deck.shuffle(&mut self.rng);

        let mut discard = DiscardPile::new();
        let flip = deck.draw().expect("a fresh deck is never empty");
        discard.discard(flip);

        let cards_each = self.state.round as usize + 2;
        for id in &self.state.join_order {
            let player = self
                .state
                .players
                .get_mut(id)
                .expect("the join order tracks the player map");
            player.hand.clear();
            for _ in 0..cards_each {
                // MAX_SEATS guarantees the deck covers the largest deal.
                let card = deck.draw().expect("the deck covers a full deal");
                player.hand.push(card);
            }
        }

        self.state.deck = deck;
        self.state.discard = discard;
        self.state.current_player = self.state.rotation.first().cloned();
        self.state.phase = GamePhase::InProgress;

        tracing::info!(
            round = self.state.round,
            wild = %wild,
            players = self.state.rotation.len(),
            "round dealt"
        );
    }

    /// Scores every hand, accumulates totals, and either deals the next
    /// round or ends the game.
    fn end_round(&mut self) -> ActionResult {
        self.state.phase = GamePhase::RoundEnding;
        let wild = self
            .state
            .wild_rank
            .expect("an ending round has a wild rank");

        let mut scores = HashMap::new();
        for id in &self.state.join_order {
            let player = self
                .state
                .players
                .get_mut(id)
                .expect("the join order tracks the player map");
            let points = score::hand_score(&player.hand, wild);
            player.score += points;
            scores.insert(player.name.clone(), points);
        }

        let mut events = vec![(Recipient::All, Event::EndRound { scores })];

        self.state.round += 1;
        if self.state.round > FINAL_ROUND {
            self.state.phase = GamePhase::GameOver;
            self.state.current_player = None;
            self.state.wild_rank = None;
            if let Some((id, champion)) =
                score::winner(&self.state.join_order, &self.state.players)
            {
                tracing::info!(
                    player = %id,
                    name = %champion.name,
                    score = champion.score,
                    "game over"
                );
                events.push((
                    Recipient::All,
                    Event::GameOver {
                        winner: champion.name.clone(),
                        score: champion.score,
                    },
                ));
            }
        } else {
            self.deal_round();
        }

        events.push(self.snapshot());
        ActionResult::accepted(events)
    }

    // -- Shared checks ------------------------------------------------------

    /// The gate in front of every in-round action: a round must be in
    /// progress, the player known, and the turn theirs.
    fn expect_turn(&self, player_id: &PlayerId) -> Result<(), RejectReason> {
        if self.state.phase != GamePhase::InProgress {
            return Err(RejectReason::NoRoundInProgress);
        }
        if !self.state.players.contains_key(player_id) {
            return Err(RejectReason::UnknownPlayer(player_id.clone()));
        }
        if self.state.current_player.as_ref() != Some(player_id) {
            return Err(RejectReason::NotYourTurn(player_id.clone()));
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        let next = self
            .state
            .current_player
            .as_ref()
            .and_then(|current| self.state.rotation.next_after(current))
            .cloned();
        self.state.current_player = next;
    }

    fn snapshot(&self) -> (Recipient, Event) {
        (
            Recipient::All,
            Event::State {
                state: self.state.clone(),
            },
        )
    }
}

// =========================================================================
// Tests
// =========================================================================
