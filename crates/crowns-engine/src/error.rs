//! Error types for the table layer.
//!
//! These cover table plumbing — finding, attaching, routing. Refused game
//! actions are not errors; they come back as
//! [`RejectReason`](crate::RejectReason) inside an
//! [`ActionResult`](crate::ActionResult).

use crowns_protocol::{PlayerId, TableId};

/// Errors that can occur during table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table does not exist.
    #[error("table {0} not found")]
    NotFound(TableId),

    /// The player is already attached to a table.
    #[error("player {0} is already at table {1}")]
    AlreadyAtTable(PlayerId, TableId),

    /// The player is not attached to any table.
    #[error("player {0} is not at any table")]
    NotAtTable(PlayerId),

    /// The player is not attached to this table.
    #[error("player {0} is not attached to table {1}")]
    NotAttached(PlayerId, TableId),

    /// The table's command channel is full or its actor is gone.
    #[error("table {0} is unavailable")]
    Unavailable(TableId),
}
