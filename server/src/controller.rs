//! # Controller session
//!
//! The server accepts exactly one active controller connection at a time
//! (§3 ControllerSession, §4.2, §4.3). Installing a new one displaces and
//! force-closes whatever was installed before it.
//!
//! Each controller gets two tasks sharing one `Framed<TcpStream,
//! LinesCodec>` split into a [`SplitSink`]/[`SplitStream`] pair: a writer
//! task that drains an outbound queue and serializes each `OPEN` line,
//! and a reader task that parses `LISTEN`/`CLOSE` commands. This mirrors
//! the teacher's per-connection outbound-queue-plus-inbound-loop shape,
//! with the mpsc channel now carrying raw wire lines instead of JSON
//! messages.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tunnel_protocol::{parse_control_command, ControlCommand, LineStream};

use crate::state::ServerState;
use crate::tunnel;

pub struct ControllerHandle {
    pub tx: mpsc::UnboundedSender<String>,
    reader_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl ControllerHandle {
    /// Force-closes this controller: aborting both tasks drops the last
    /// references to the split `Framed`, which drops the `TcpStream`.
    pub fn close(&self) {
        self.reader_task.abort();
        self.writer_task.abort();
    }
}

/// Installs `framed` as the new controller, displacing and closing the
/// previous one if there was one (§4.2's single-controller invariant).
/// `first_command` is whatever the connection's very first line already
/// parsed as (the acceptor had to read it to classify the connection in
/// the first place), and is executed before the reader loop begins.
pub async fn install(
    state: &Arc<ServerState>,
    framed: LineStream<TcpStream>,
    first_command: Option<ControlCommand>,
    peer: SocketAddr,
) {
    let (mut sink, mut stream) = framed.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let identity = tx.clone();

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if sink.send(line).await.is_err() {
                break;
            }
        }
    });

    let reader_state = state.clone();
    let reader_task = tokio::spawn(async move {
        if let Some(cmd) = first_command {
            execute_command(&reader_state, cmd).await;
        }
        loop {
            match stream.next().await {
                None => {
                    info!(%peer, "controller disconnected");
                    break;
                }
                Some(Ok(line)) => match parse_control_command(&line) {
                    Some(cmd) => execute_command(&reader_state, cmd).await,
                    None => warn!(%peer, %line, "unrecognized control command; ignoring"),
                },
                Some(Err(err)) => {
                    warn!(%peer, %err, "control line error; ignoring");
                }
            }
        }

        // Only clear the slot if we are still the installed controller —
        // a later controller may already have displaced us.
        let mut guard = reader_state.controller.lock().await;
        if matches!(guard.as_ref(), Some(current) if current.tx.same_channel(&identity)) {
            guard.take();
        }
    });

    let handle = ControllerHandle {
        tx,
        reader_task,
        writer_task,
    };
    let previous = state.controller.lock().await.replace(handle);
    if let Some(previous) = previous {
        previous.close();
        info!("previous controller displaced by new connection from {peer}");
    } else {
        info!(%peer, "controller installed");
    }
}

/// Executes one parsed `LISTEN`/`CLOSE` command against the tunnel
/// registry (§4.3).
async fn execute_command(state: &Arc<ServerState>, cmd: ControlCommand) {
    match cmd {
        ControlCommand::Listen { port } => tunnel::start(state, port).await,
        ControlCommand::Close { port } => tunnel::stop(state, port).await,
    }
}
