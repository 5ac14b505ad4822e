//! Per-connection handler: decode actions, route them, pump events back.
//!
//! Each accepted connection runs this in its own task. The flow is:
//!
//!   1. Split the socket; start the outbound pump (table events → frames).
//!   2. Wait for the first decodable `join` action — it binds the
//!      connection to a player id and attaches the pump to the table.
//!   3. Loop: decode actions, hand them to the table. Whatever cannot be
//!      decoded is logged and dropped here, at the boundary; the engine
//!      only ever sees well-formed actions.
//!   4. On close, detach. The player keeps their seat in the game — a
//!      later connection presenting the same id resumes the stream.

use std::sync::Arc;

use crowns_engine::Event;
use crowns_protocol::{Action, Codec, JsonCodec, PlayerId};
use crowns_transport::{WsConnection, WsSender};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::server::ServerState;
use crate::CrownsError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WsConnection,
    state: Arc<ServerState>,
) -> Result<(), CrownsError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (sender, mut receiver) = conn.split();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let pump = spawn_event_pump(sender, event_rx, state.codec);

    let mut joined: Option<PlayerId> = None;

    loop {
        let data = match receiver.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let action: Action = match state.codec.decode(&data) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "dropping undecodable message");
                continue;
            }
        };

        match &joined {
            None => {
                // The first action must introduce the player; anything
                // else has no one to act as.
                if !matches!(action, Action::Join { .. }) {
                    tracing::debug!(%conn_id, "dropping action before join");
                    continue;
                }
                let player_id = action.player_id().clone();
                {
                    let mut tables = state.tables.lock().await;
                    tables
                        .join_table(
                            player_id.clone(),
                            state.default_table,
                            event_tx.clone(),
                        )
                        .await?;
                    tables.submit(&player_id, action).await?;
                }
                tracing::info!(%conn_id, player = %player_id, "connection bound to player");
                joined = Some(player_id);
            }
            Some(player_id) => {
                state.tables.lock().await.submit(player_id, action).await?;
            }
        }
    }

    // Stop broadcasts to this connection; the seat itself stays taken.
    if let Some(player_id) = joined {
        let mut tables = state.tables.lock().await;
        if let Err(e) = tables.leave_table(player_id).await {
            tracing::debug!(%conn_id, error = %e, "detach on close failed");
        }
    }
    pump.abort();

    Ok(())
}

/// Drains table events into the socket until either side goes away.
fn spawn_event_pump(
    mut sender: WsSender,
    mut events: mpsc::UnboundedReceiver<Event>,
    codec: JsonCodec,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sender.send(&bytes).await.is_err() {
                // Peer is gone; the handler's recv loop ends itself.
                break;
            }
        }
    })
}
