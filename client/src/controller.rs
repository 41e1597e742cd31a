//! # Controller
//!
//! The client's single outward TCP connection to the server (§4.6). One
//! reader task parses `OPEN <sid> <port>` notices off it and hands each
//! one to the [`crate::session`] opener; one writer task drains the
//! outbound queue the console and the opener feed `LISTEN`/`CLOSE`/`DATA`
//! lines into — mirroring the split-sink/split-stream shape the server's
//! own controller session uses for its side of the same connection.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tunnel_protocol::OpenNotice;

use crate::session;
use crate::state::ClientState;

/// Dials the server's control port and splits the resulting line stream
/// into a writer task (draining `rx`) and a reader loop (this task) that
/// dispatches `OPEN` notices until the connection closes.
pub async fn run(state: Arc<ClientState>, stream: TcpStream, mut rx: mpsc::UnboundedReceiver<String>) {
    let framed = tunnel_protocol::frame(stream);
    let (mut sink, mut stream) = framed.split();

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if sink.send(line).await.is_err() {
                break;
            }
        }
    });

    loop {
        match stream.next().await {
            None => {
                info!("controller connection closed by server");
                break;
            }
            Some(Ok(line)) => match OpenNotice::parse(&line) {
                Some(notice) => {
                    let state = state.clone();
                    tokio::spawn(session::open(state, notice));
                }
                None => warn!(%line, "unrecognized line on controller channel; ignoring"),
            },
            Some(Err(err)) => {
                warn!(%err, "controller line error; ignoring");
            }
        }
    }

    writer.abort();
}
