//! Unified error type for the Crowns server.

use crowns_engine::TableError;
use crowns_protocol::ProtocolError;
use crowns_transport::TransportError;

/// Top-level error wrapping every layer's error type.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so `?` converts layer errors as they bubble up through the server.
#[derive(Debug, thiserror::Error)]
pub enum CrownsError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A table-level error (not found, not attached, unavailable).
    #[error(transparent)]
    Table(#[from] TableError),
}
