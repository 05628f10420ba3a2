//! `DraftServer` builder and accept loop.
//!
//! This is the entry point for running a Draftroom server. It ties
//! together the layers: transport → protocol → room directory.

use std::sync::Arc;

use draftroom_core::{DraftConfig, RoomDirectory};
use draftroom_protocol::{Item, JsonCodec};
use draftroom_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::ServerError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// directory sits behind a `Mutex`; room actors themselves run
/// unlocked, so the lock only covers registry lookups and residency
/// bookkeeping.
pub(crate) struct ServerState {
    pub(crate) directory: Mutex<RoomDirectory>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Draftroom server.
///
/// # Example
///
/// ```rust,ignore
/// use draftroom::prelude::*;
///
/// let server = DraftServer::builder()
///     .bind("0.0.0.0:8080")
///     .catalog(catalog)
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct DraftServerBuilder {
    bind_addr: String,
    catalog: Vec<Item>,
    config: DraftConfig,
}

impl DraftServerBuilder {
    /// Creates a new builder with default settings and an empty catalog.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            catalog: Vec::new(),
            config: DraftConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the item catalog every room drafts from.
    pub fn catalog(mut self, catalog: impl Into<Vec<Item>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Sets the timing configuration applied to every room.
    pub fn config(mut self, config: DraftConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<DraftServer, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            directory: Mutex::new(RoomDirectory::new(
                self.catalog,
                self.config,
            )),
            codec: JsonCodec,
        });

        Ok(DraftServer { transport, state })
    }
}

impl Default for DraftServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Draftroom server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DraftServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DraftServer {
    /// Creates a new builder.
    pub fn builder() -> DraftServerBuilder {
        DraftServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("Draftroom server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
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
