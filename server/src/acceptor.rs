//! # Acceptor
//!
//! The server's single well-known listener. Every newly accepted
//! connection is dispatched by reading its first line and classifying
//! it as a data channel or a controller connection (§4.2).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{error, warn};
use tunnel_protocol::{classify_first_line, recv_line, relay_framed, FirstLine, Line};

use crate::controller;
use crate::state::ServerState;

/// Runs forever, accepting connections on the control listener and
/// spawning one dispatch task per connection so a slow or malicious
/// first line never blocks the acceptor (§5).
pub async fn run(state: Arc<ServerState>, listener: TcpListener) {
    loop {
        match listener.accept().await {
            Ok((socket, peer)) => {
                let state = state.clone();
                tokio::spawn(dispatch(state, socket, peer));
            }
            Err(err) => {
                error!(%err, "accept failed on control listener");
            }
        }
    }
}

async fn dispatch(state: Arc<ServerState>, socket: TcpStream, peer: SocketAddr) {
    let mut framed = tunnel_protocol::frame(socket);
    let line = match recv_line(&mut framed).await {
        Ok(Line::Data(line)) => line,
        Ok(Line::Eof) => return,
        Err(err) => {
            warn!(%peer, %err, "dropping connection: first-line framing error");
            return;
        }
    };

    match classify_first_line(&line) {
        FirstLine::Data(sid) => match state.pop_pending(sid) {
            Some(pending) => {
                tokio::spawn(relay_framed(framed, pending.socket));
            }
            None => {
                warn!(%peer, %sid, "DATA channel arrived with no matching pending session");
            }
        },
        FirstLine::InvalidData => {
            warn!(%peer, %line, "DATA channel with an unparsable session id; closing");
        }
        FirstLine::Control(first_command) => {
            controller::install(&state, framed, first_command, peer).await;
        }
    }
}
