//! `CrownsServer` builder and accept loop.
//!
//! This ties the layers together: transport → protocol → engine. The
//! server owns the table manager and a default table; every accepted
//! connection gets its own handler task.

use std::sync::Arc;

use crowns_engine::{GameConfig, TableManager};
use crowns_protocol::{JsonCodec, TableId};
use crowns_transport::WsListener;
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::CrownsError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it clones cheaply across tasks; the manager sits
/// behind one `Mutex` because handlers only touch it briefly to attach
/// and route — the per-table actors do the actual work.
pub(crate) struct ServerState {
    pub(crate) tables: Mutex<TableManager>,
    pub(crate) codec: JsonCodec,
    pub(crate) default_table: TableId,
}

/// Builder for configuring and starting a Crowns server.
///
/// # Example
///
/// ```rust,no_run
/// use crowns::CrownsServer;
///
/// # async fn run() -> Result<(), crowns::CrownsError> {
/// let server = CrownsServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CrownsServerBuilder {
    bind_addr: String,
    game_config: GameConfig,
}

impl CrownsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            game_config: GameConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the game configuration for the default table.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Binds the listener and spins up the default table.
    pub async fn build(self) -> Result<CrownsServer, CrownsError> {
        let listener = WsListener::bind(&self.bind_addr).await?;

        let mut tables = TableManager::new();
        let default_table = tables.create_table(self.game_config);

        let state = Arc::new(ServerState {
            tables: Mutex::new(tables),
            codec: JsonCodec,
            default_table,
        });

        Ok(CrownsServer { listener, state })
    }
}

impl Default for CrownsServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Crowns game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CrownsServer {
    listener: WsListener,
    state: Arc<ServerState>,
}

impl CrownsServer {
    /// Creates a new builder.
    pub fn builder() -> CrownsServerBuilder {
        CrownsServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), CrownsError> {
        tracing::info!("crowns server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
