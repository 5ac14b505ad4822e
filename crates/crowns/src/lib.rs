//! # Crowns
//!
//! A multi-round rummy game server. Two or more players share a deck and
//! a discard pile across eleven rounds; each round a different rank is
//! wild, and a player ends the round by proving their whole hand divides
//! into books and runs. Lowest total score after round eleven wins.
//!
//! This crate is the front door: it binds a WebSocket listener, wires
//! connections to the game engine, and re-exports the types a client or
//! embedder needs.
//!
//! ```rust,no_run
//! use crowns::CrownsServer;
//!
//! # async fn run() -> Result<(), crowns::CrownsError> {
//! let server = CrownsServer::builder().bind("0.0.0.0:3000").build().await?;
//! server.run().await
//! # }
//! ```
//!
//! The layers underneath, each its own crate:
//!
//! - [`crowns_cards`] — cards, the deck, the discard pile
//! - [`crowns_protocol`] — wire actions and codecs
//! - [`crowns_engine`] — the rule engine, table actors, and events
//! - [`crowns_transport`] — WebSocket plumbing

mod error;
mod handler;
mod server;

pub use error::CrownsError;
pub use server::{CrownsServer, CrownsServerBuilder};

// Re-exports so embedders and tests rarely need the layer crates directly.
pub use crowns_cards::{Card, Deck, DiscardPile, Rank, Suit};
pub use crowns_engine::{
    Event, GameConfig, GamePhase, GameState, LateJoinPolicy, Player,
};
pub use crowns_protocol::{Action, DrawSource, PlayerId, TableId};
