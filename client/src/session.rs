//! # Session opener
//!
//! Runs once per `OPEN <sid> <server_port>` notice (§4.7): resolves the
//! server port against the Mapping registry, dials a fresh data channel
//! and the private target, and hands both sockets to the shared Relay.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, warn};
use tunnel_protocol::{relay_pair, OpenNotice};

use crate::state::ClientState;

/// Executes the five steps of §4.7 for one `OPEN` notice. Every failure
/// path just logs and returns — the external socket the server is
/// holding pending will be reclaimed when it eventually closes (§7).
pub async fn open(state: Arc<ClientState>, notice: OpenNotice) {
    let mapping = match state.lookup(notice.port).await {
        Some(mapping) => mapping,
        None => {
            warn!(sid = %notice.sid, port = notice.port, "OPEN for a port with no mapping; dropping");
            return;
        }
    };

    let server_addr = (state.server_addr.0.as_str(), state.server_addr.1);
    let mut data_channel = match TcpStream::connect(server_addr).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(sid = %notice.sid, %err, "failed to dial data channel; dropping");
            return;
        }
    };

    let identify = format!("DATA {}\n", notice.sid);
    if let Err(err) = data_channel.write_all(identify.as_bytes()).await {
        warn!(sid = %notice.sid, %err, "failed to identify data channel; dropping");
        return;
    }

    let target_addr = (mapping.target_host.as_str(), mapping.target_port);
    let target = match TcpStream::connect(target_addr).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(sid = %notice.sid, %err, host = %mapping.target_host, port = mapping.target_port, "failed to dial private target; closing data channel");
            return;
        }
    };

    debug!(sid = %notice.sid, port = notice.port, "session opened; starting relay");
    relay_pair(data_channel, target).await;
}
