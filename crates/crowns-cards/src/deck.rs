//! The draw deck and the discard pile.
//!
//! Both are plain ordered stacks of cards — the top is the end of the
//! vector, so drawing is a pop. The deck is rebuilt fresh at every deal;
//! the card universe for a round is fixed at construction and only moves
//! between the deck, the discard pile, and player hands afterwards.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Card, Rank, Suit};

/// How many full copies of the suited deck (and Joker triplets) a game uses.
const COPIES: usize = 2;

/// Jokers added per deck copy.
const JOKERS_PER_COPY: usize = 3;

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

/// The face-down draw stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Cards in a freshly built deck: 2 × (5 suits × 11 ranks) + 6 Jokers.
    pub const SIZE: usize = COPIES * (5 * 11 + JOKERS_PER_COPY);

    /// Builds the full, unshuffled 116-card deck.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for _ in 0..COPIES {
            for suit in Suit::all() {
                for rank in Rank::all() {
                    cards.push(Card::Suited(rank, suit));
                }
            }
            for _ in 0..JOKERS_PER_COPY {
                cards.push(Card::Joker);
            }
        }
        Self { cards }
    }

    /// Uniformly permutes the deck.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the top card, or `None` if the deck is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remaining card count.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DiscardPile
// ---------------------------------------------------------------------------

/// The face-up discard pile. The top card is both the most recent discard
/// and the one a draw takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    /// An empty pile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a card on top.
    pub fn discard(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes and returns the top card, or `None` if the pile is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// The card a draw would take, without taking it.
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
