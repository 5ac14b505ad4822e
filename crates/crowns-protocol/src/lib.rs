//! Wire protocol for Crowns.
//!
//! This crate defines what travels between clients and the server:
//!
//! - **Identities** ([`PlayerId`], [`TableId`]) and delivery targets
//!   ([`Recipient`])
//! - **Actions** ([`Action`], [`DrawSource`]) — the closed set of things a
//!   client can ask the engine to do
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how messages become bytes
//! - **Errors** ([`ProtocolError`])
//!
//! Outbound events live in the engine crate, next to the game state they
//! carry; this crate stays a leaf that only knows about cards and ids.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Action, DrawSource, PlayerId, Recipient, TableId};
