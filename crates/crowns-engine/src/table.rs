//! Table actor: an isolated Tokio task that owns one game session.
//!
//! Each table runs in its own task and talks to the rest of the process
//! only through an mpsc channel. That channel is what makes "one action
//! at a time" true: commands queue up and the actor applies each to
//! completion before looking at the next, so the engine never needs a
//! lock and no observer ever sees a half-applied state.

use std::collections::HashMap;

use crowns_protocol::{Action, PlayerId, Recipient, TableId};
use tokio::sync::{mpsc, oneshot};

use crate::config::{GameConfig, GamePhase};
use crate::events::Event;
use crate::session::{ActionOutcome, GameSession};
use crate::TableError;

/// Channel sender delivering outbound events to one attached connection.
pub type PlayerSender = mpsc::UnboundedSender<Event>;

/// Commands sent to a table actor through its channel. Variants carrying
/// a `oneshot::Sender` are request/reply; the rest are fire-and-forget.
pub(crate) enum TableCommand {
    /// Register an outbound sender for a player id and send it a snapshot.
    Attach {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// Drop a player's outbound sender. The player stays in the game.
    Detach {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// Feed one action to the game session.
    Action { action: Action },

    /// Request table metadata.
    Info { reply: oneshot::Sender<TableInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of table metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct TableInfo {
    /// The table's unique ID.
    pub table_id: TableId,
    /// The game's lifecycle phase.
    pub phase: GamePhase,
    /// Players registered in the game.
    pub player_count: usize,
    /// Connections currently receiving broadcasts.
    pub attached: usize,
}

/// Handle to a running table actor. Cheap to clone — it is just a wrapped
/// `mpsc::Sender`. The `TableManager` holds one per table.
#[derive(Clone)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    /// Returns the table's unique ID.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Attaches a player's outbound sender to the broadcast set.
    pub async fn attach(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Attach {
                player_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?;
        reply_rx
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?
    }

    /// Detaches a player's outbound sender.
    pub async fn detach(&self, player_id: PlayerId) -> Result<(), TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Detach {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?;
        reply_rx
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?
    }

    /// Submits a game action (fire-and-forget).
    pub async fn submit(&self, action: Action) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Action { action })
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }

    /// Requests the current table info.
    pub async fn info(&self) -> Result<TableInfo, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))?;
        reply_rx
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }

    /// Tells the table to shut down.
    pub async fn shutdown(&self) -> Result<(), TableError> {
        self.sender
            .send(TableCommand::Shutdown)
            .await
            .map_err(|_| TableError::Unavailable(self.table_id))
    }
}

/// The internal table actor. Runs inside a Tokio task.
struct TableActor {
    table_id: TableId,
    session: GameSession,
    /// Per-player outbound channels: who hears the broadcasts.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<TableCommand>,
}

impl TableActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(table_id = %self.table_id, "table actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                TableCommand::Attach {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_attach(player_id, sender);
                    let _ = reply.send(result);
                }
                TableCommand::Detach { player_id, reply } => {
                    let result = self.handle_detach(player_id);
                    let _ = reply.send(result);
                }
                TableCommand::Action { action } => {
                    self.handle_action(action);
                }
                TableCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                TableCommand::Shutdown => {
                    tracing::info!(table_id = %self.table_id, "table shutting down");
                    break;
                }
            }
        }

        tracing::info!(table_id = %self.table_id, "table actor stopped");
    }

    /// Registers (or replaces) a player's outbound sender and hands it the
    /// current snapshot so a fresh connection is immediately up to date.
    /// Re-attaching under the same id is how a returning connection picks
    /// the stream back up.
    fn handle_attach(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), TableError> {
        let snapshot = Event::State {
            state: self.session.state().clone(),
        };
        let _ = sender.send(snapshot);

        self.senders.insert(player_id.clone(), sender);
        tracing::info!(
            table_id = %self.table_id,
            player = %player_id,
            attached = self.senders.len(),
            "player attached"
        );
        Ok(())
    }

    /// Drops a player's sender. Game state is untouched: a player with no
    /// connection simply stops hearing broadcasts, and the game waits for
    /// their next action indefinitely.
    fn handle_detach(&mut self, player_id: PlayerId) -> Result<(), TableError> {
        if self.senders.remove(&player_id).is_none() {
            return Err(TableError::NotAttached(player_id, self.table_id));
        }
        tracing::info!(
            table_id = %self.table_id,
            player = %player_id,
            attached = self.senders.len(),
            "player detached"
        );
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        let result = self.session.apply(action);
        if let ActionOutcome::Rejected(reason) = &result.outcome {
            tracing::debug!(
                table_id = %self.table_id,
                %reason,
                "action rejected"
            );
        }
        self.dispatch(result.events);
    }

    /// Delivers events to the right attached connections.
    fn dispatch(&self, events: Vec<(Recipient, Event)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(player_id) => {
                    self.send_to(&player_id, event);
                }
            }
        }
    }

    /// Sends one event to one player. Silently drops if the receiver is
    /// gone (connection closed without detaching).
    fn send_to(&self, player_id: &PlayerId, event: Event) {
        if let Some(sender) = self.senders.get(player_id) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> TableInfo {
        TableInfo {
            table_id: self.table_id,
            phase: self.session.phase(),
            player_count: self.session.state().players.len(),
            attached: self.senders.len(),
        }
    }
}

/// Spawns a new table actor task and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it fills.
pub(crate) fn spawn_table(
    table_id: TableId,
    config: GameConfig,
    channel_size: usize,
) -> TableHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = TableActor {
        table_id,
        session: GameSession::new(config),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    TableHandle {
        table_id,
        sender: tx,
    }
}
