//! # Server State
//!
//! Holds the shared state for the relay server:
//! - **Tunnel registry**: one entry per exposed port, keyed by port
//! - **Pending table**: externally-accepted sockets awaiting a matching
//!   data channel, keyed by session ID
//! - **Current controller**: at most one installed at a time
//!
//! Registries that see concurrent access from many tasks use [`DashMap`]
//! for lock-free reads and writes, the same choice the teacher made for
//! its agent/connection/session registries.

use dashmap::DashMap;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tunnel_protocol::{SessionId, SessionIdAllocator};

use crate::controller::ControllerHandle;

/// An externally-accepted socket waiting to be paired with its matching
/// `DATA <sid>` channel (§4.5 / §3 PendingSession).
pub struct PendingSession {
    pub socket: TcpStream,
    pub port: u16,
}

/// One exposed server-side listener (§3 Tunnel). The listener itself is
/// owned by `accept_task`'s future; aborting the task drops it, which is
/// how `stop(port)` closes the socket.
pub struct Tunnel {
    pub accept_task: JoinHandle<()>,
}

/// Shared application state, handed to every spawned task as a cloned
/// `Arc<ServerState>`.
pub struct ServerState {
    pub tunnels: DashMap<u16, Tunnel>,
    pub pending: DashMap<SessionId, PendingSession>,
    pub controller: Mutex<Option<ControllerHandle>>,
    pub session_ids: SessionIdAllocator,
}

impl ServerState {
    pub fn new() -> Self {
        ServerState {
            tunnels: DashMap::new(),
            pending: DashMap::new(),
            controller: Mutex::new(None),
            session_ids: SessionIdAllocator::new(),
        }
    }

    /// Publishes a newly accepted external socket (§4.5 `push`).
    pub fn push_pending(&self, sid: SessionId, session: PendingSession) {
        self.pending.insert(sid, session);
    }

    /// Claims a pending external socket by session id (§4.5 `pop`).
    pub fn pop_pending(&self, sid: SessionId) -> Option<PendingSession> {
        self.pending.remove(&sid).map(|(_, session)| session)
    }
}
