//! Table manager: creates, tracks, and routes players to tables.
//!
//! Every game lives in its own session object behind a table actor; the
//! manager is just the directory. Nothing here is a process-wide
//! singleton — hold two managers and you have two independent worlds.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crowns_protocol::{Action, PlayerId, TableId};

use crate::config::GameConfig;
use crate::table::{spawn_table, PlayerSender, TableHandle, TableInfo};
use crate::TableError;

/// Counter for generating unique table IDs.
static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for table actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Manages all active tables and tracks which player sits at which.
pub struct TableManager {
    /// Active tables, keyed by table ID.
    tables: HashMap<TableId, TableHandle>,

    /// Maps each attached player to their table.
    /// A player is attached to at most ONE table at a time (key invariant).
    player_tables: HashMap<PlayerId, TableId>,
}

impl TableManager {
    /// Creates a new, empty table manager.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            player_tables: HashMap::new(),
        }
    }

    /// Creates a new table and returns its ID.
    pub fn create_table(&mut self, config: GameConfig) -> TableId {
        let table_id = TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_table(table_id, config, DEFAULT_CHANNEL_SIZE);
        self.tables.insert(table_id, handle);
        tracing::info!(%table_id, "table created");
        table_id
    }

    /// Attaches a player to a table's broadcast set.
    ///
    /// Enforces the "one table at a time" invariant. Re-attaching to the
    /// same table is fine — it refreshes the player's outbound channel.
    pub async fn join_table(
        &mut self,
        player_id: PlayerId,
        table_id: TableId,
        sender: PlayerSender,
    ) -> Result<(), TableError> {
        if let Some(current) = self.player_tables.get(&player_id) {
            if *current != table_id {
                return Err(TableError::AlreadyAtTable(player_id, *current));
            }
        }

        let handle = self
            .tables
            .get(&table_id)
            .ok_or(TableError::NotFound(table_id))?;

        handle.attach(player_id.clone(), sender).await?;
        self.player_tables.insert(player_id, table_id);
        Ok(())
    }

    /// Detaches a player from their current table.
    pub async fn leave_table(&mut self, player_id: PlayerId) -> Result<(), TableError> {
        let table_id = self
            .player_tables
            .get(&player_id)
            .copied()
            .ok_or_else(|| TableError::NotAtTable(player_id.clone()))?;

        if let Some(handle) = self.tables.get(&table_id) {
            handle.detach(player_id.clone()).await?;
        }

        self.player_tables.remove(&player_id);
        Ok(())
    }

    /// Routes a game action to the acting player's table.
    pub async fn submit(
        &self,
        player_id: &PlayerId,
        action: Action,
    ) -> Result<(), TableError> {
        let table_id = self
            .player_tables
            .get(player_id)
            .ok_or_else(|| TableError::NotAtTable(player_id.clone()))?;

        let handle = self
            .tables
            .get(table_id)
            .ok_or(TableError::NotFound(*table_id))?;

        handle.submit(action).await
    }

    /// Returns info about a specific table.
    pub async fn table_info(&self, table_id: TableId) -> Result<TableInfo, TableError> {
        let handle = self
            .tables
            .get(&table_id)
            .ok_or(TableError::NotFound(table_id))?;
        handle.info().await
    }

    /// Shuts down a table and removes its players from the index.
    pub async fn destroy_table(&mut self, table_id: TableId) -> Result<(), TableError> {
        let handle = self
            .tables
            .remove(&table_id)
            .ok_or(TableError::NotFound(table_id))?;

        let _ = handle.shutdown().await;
        self.player_tables.retain(|_, at| *at != table_id);

        tracing::info!(%table_id, "table destroyed");
        Ok(())
    }

    /// Returns the table a player is currently attached to, if any.
    pub fn player_table(&self, player_id: &PlayerId) -> Option<TableId> {
        self.player_tables.get(player_id).copied()
    }

    /// Returns the number of active tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Lists all active table IDs.
    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}
