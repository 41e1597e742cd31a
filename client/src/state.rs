//! # Client state
//!
//! Holds the Mapping registry — exposed-server-port → private target —
//! plus the pieces a freshly opened session needs to reach both the
//! server and its own target (§3 TunnelMapping, §4.6).

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::warn;
use tunnel_protocol::MAX_MAPPINGS;

/// One entry in the Mapping registry: an exposed server port and the
/// private address traffic on it should land on.
#[derive(Debug, Clone)]
pub struct TunnelMapping {
    pub target_host: String,
    pub target_port: u16,
}

/// Shared client state, handed to the console and every session-opener
/// task as a cloned `Arc<ClientState>`.
pub struct ClientState {
    pub server_addr: (String, u16),
    mappings: RwLock<HashMap<u16, TunnelMapping>>,
    pub controller_tx: mpsc::UnboundedSender<String>,
}

/// Why `add` was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMappingError {
    RegistryFull,
}

impl ClientState {
    pub fn new(server_addr: (String, u16), controller_tx: mpsc::UnboundedSender<String>) -> Self {
        ClientState {
            server_addr,
            mappings: RwLock::new(HashMap::new()),
            controller_tx,
        }
    }

    /// `add <server_port> <client_addr> <client_port>` (§6). Bounded at
    /// `MAX_MAPPINGS`; replacing an existing entry for the same port
    /// never counts against the cap.
    pub async fn add_mapping(
        &self,
        server_port: u16,
        target_host: String,
        target_port: u16,
    ) -> Result<(), AddMappingError> {
        let mut mappings = self.mappings.write().await;
        if !mappings.contains_key(&server_port) && mappings.len() >= MAX_MAPPINGS {
            return Err(AddMappingError::RegistryFull);
        }
        mappings.insert(
            server_port,
            TunnelMapping {
                target_host,
                target_port,
            },
        );
        Ok(())
    }

    /// `remove <server_port>`. Returns whether a mapping was actually
    /// removed, so the caller only sends `CLOSE` when one existed.
    pub async fn remove_mapping(&self, server_port: u16) -> bool {
        self.mappings.write().await.remove(&server_port).is_some()
    }

    /// `list`: a snapshot of the registry in no particular order.
    pub async fn list_mappings(&self) -> Vec<(u16, TunnelMapping)> {
        self.mappings
            .read()
            .await
            .iter()
            .map(|(port, mapping)| (*port, mapping.clone()))
            .collect()
    }

    /// Looks up the target for an `OPEN <sid> <server_port>` notice
    /// (§4.7 step 1).
    pub async fn lookup(&self, server_port: u16) -> Option<TunnelMapping> {
        self.mappings.read().await.get(&server_port).cloned()
    }

    /// Queues a `LISTEN`/`CLOSE` line on the controller channel. A send
    /// error means the controller connection has already gone away; it
    /// is simply logged, matching the benign-send-failure discipline
    /// the server side uses for its own controller snapshot (§5, §9).
    pub fn send_command(&self, line: impl Into<String>) {
        let line = line.into();
        if self.controller_tx.send(line.clone()).is_err() {
            warn!(%line, "controller channel closed; command dropped");
        }
    }
}
