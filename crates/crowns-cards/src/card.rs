//! Card value types: ranks, suits, and the cards themselves.
//!
//! A Crowns deck runs 3 through King — no aces, no deuces — across five
//! suits, plus Jokers. Cards are plain values: the two physical copies of
//! the same rank and suit that every game contains are indistinguishable.
//!
//! On the wire a card is its display string (`"3♥"`, `"10★"`, `"Joker"`),
//! so clients never deal with a structured card object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// The eleven ranks in play order.
///
/// The ordering matters twice: runs are contiguous blocks in this order,
/// and the wild rank escalates through it round by round (round 1 → 3,
/// round 11 → K).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    /// All eleven ranks in play order.
    pub const fn all() -> [Rank; 11] {
        [
            Rank::Three,
            Rank::Four,
            Rank::Five,
            Rank::Six,
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Ten,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
        ]
    }

    /// Position in play order: 3 → 0, ..., K → 10.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Face value used by the scorer for non-wild cards.
    /// Numerals score their number; J, Q, K score 11, 12, 13.
    pub fn value(self) -> u32 {
        self.index() as u32 + 3
    }

    /// The rank that is wild in the given round: the `round`-th rank
    /// (1-indexed) in play order. `None` outside rounds 1..=11.
    pub fn wild_for_round(round: u8) -> Option<Rank> {
        match round {
            1..=11 => Some(Rank::all()[round as usize - 1]),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            numeral => write!(f, "{}", numeral.value()),
        }
    }
}

impl FromStr for Rank {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            other => Err(ParseCardError::UnknownRank(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// The five suits. Stars are the fifth suit that a standard four-suit deck
/// lacks; other than display there is nothing special about any of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Suit {
    #[serde(rename = "★")]
    Stars,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♣")]
    Clubs,
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♦")]
    Diamonds,
}

impl Suit {
    /// All five suits in deck-construction order.
    pub const fn all() -> [Suit; 5] {
        [
            Suit::Stars,
            Suit::Hearts,
            Suit::Clubs,
            Suit::Spades,
            Suit::Diamonds,
        ]
    }

    /// Unicode symbol used on the wire and in logs.
    pub fn symbol(self) -> char {
        match self {
            Suit::Stars => '★',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
            Suit::Diamonds => '♦',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Suit {
    type Error = ParseCardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '★' => Ok(Suit::Stars),
            '♥' => Ok(Suit::Hearts),
            '♣' => Ok(Suit::Clubs),
            '♠' => Ok(Suit::Spades),
            '♦' => Ok(Suit::Diamonds),
            other => Err(ParseCardError::UnknownSuit(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A single card: a Joker, or a rank/suit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Card {
    Joker,
    Suited(Rank, Suit),
}

impl Card {
    /// The literal rank, if any. Jokers have none.
    pub fn rank(self) -> Option<Rank> {
        match self {
            Card::Joker => None,
            Card::Suited(rank, _) => Some(rank),
        }
    }

    /// The suit, if any. Jokers have none.
    pub fn suit(self) -> Option<Suit> {
        match self {
            Card::Joker => None,
            Card::Suited(_, suit) => Some(suit),
        }
    }

    /// Whether this card is wild under the given wild rank: Jokers always,
    /// suited cards exactly when their rank matches.
    pub fn is_wild(self, wild: Rank) -> bool {
        match self {
            Card::Joker => true,
            Card::Suited(rank, _) => rank == wild,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Joker => write!(f, "Joker"),
            Card::Suited(rank, suit) => write!(f, "{rank}{suit}"),
        }
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Joker" {
            return Ok(Card::Joker);
        }
        // Rank first, one suit symbol last. The suit symbols are multi-byte
        // in UTF-8, so split at the last character boundary.
        let mut chars = s.chars();
        let suit_char = chars.next_back().ok_or(ParseCardError::Empty)?;
        let rank_str = chars.as_str();
        let rank = rank_str.parse()?;
        let suit = Suit::try_from(suit_char)?;
        Ok(Card::Suited(rank, suit))
    }
}

/// Cards travel as display strings, not structs.
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a card string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCardError {
    #[error("empty card string")]
    Empty,

    #[error("unrecognized rank {0:?}")]
    UnknownRank(String),

    #[error("unrecognized suit {0:?}")]
    UnknownSuit(char),
}

// =========================================================================
// Tests
// =========================================================================
