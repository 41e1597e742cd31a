//! # Tunnel registry & acceptor
//!
//! `start`/`stop` implement the Tunnel registry's lifecycle (§4.4); the
//! accept loop spawned by `start` is the Tunnel acceptor: it mints a
//! session id per externally-accepted socket, publishes it to the
//! pending table, and asks the current controller to open a matching
//! data channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tunnel_protocol::{OpenNotice, MAX_TUNNELS};

use crate::state::{PendingSession, ServerState, Tunnel};

/// `LISTEN <port>`: idempotent on failure (§4.4). Refuses if the
/// registry is at capacity, the port is already in use by this process,
/// or the bind itself fails — in every refusal case it logs and returns
/// without touching the registry.
pub async fn start(state: &Arc<ServerState>, port: u16) {
    if state.tunnels.contains_key(&port) {
        warn!(port, "LISTEN ignored: tunnel already active on this port");
        return;
    }
    if state.tunnels.len() >= MAX_TUNNELS {
        warn!(port, cap = MAX_TUNNELS, "LISTEN refused: tunnel registry is full");
        return;
    }

    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(err) => {
            warn!(port, %err, "LISTEN refused: failed to bind");
            return;
        }
    };
    info!(port, "tunnel listening");

    let task_state = state.clone();
    let accept_task = tokio::spawn(async move {
        accept_loop(task_state, listener, port).await;
    });
    state.tunnels.insert(port, Tunnel { accept_task });
}

/// `CLOSE <port>`: closes the listener (by aborting its accept task) and
/// removes the registry entry. Pending sessions already enqueued for
/// this tunnel are left alone — they are reclaimed when their peer
/// closes, not forcibly torn down (§4.4, §9 open question).
pub async fn stop(state: &Arc<ServerState>, port: u16) {
    let Some((_, tunnel)) = state.tunnels.remove(&port) else {
        debug!(port, "CLOSE ignored: no tunnel on this port");
        return;
    };
    tunnel.accept_task.abort();
    let _ = tokio::time::timeout(Duration::from_millis(500), tunnel.accept_task).await;
    info!(port, "tunnel stopped");
}

/// Loops accepting external connections on one tunnel's listener until
/// the listener errors (or, more commonly, this task is aborted by
/// `stop`).
async fn accept_loop(state: Arc<ServerState>, listener: TcpListener, port: u16) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                info!(port, %err, "tunnel accept loop ending");
                return;
            }
        };

        let sid = state.session_ids.next();
        debug!(port, %sid, %peer, "accepted external connection");
        state.push_pending(sid, PendingSession { socket, port });

        let snapshot = state.controller.lock().await.as_ref().map(|h| h.tx.clone());
        match snapshot {
            Some(tx) => {
                let notice = OpenNotice::new(sid, port).to_line();
                if tx.send(notice).is_err() {
                    warn!(%sid, "controller channel closed while notifying; external stays pending");
                } else {
                    debug!(%sid, port, "notified controller of pending session");
                }
            }
            None => {
                state.pop_pending(sid);
                debug!(%sid, port, "no active controller; closing external immediately");
            }
        }
    }
}
