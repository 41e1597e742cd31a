//! # Console (§4.9, ambient/non-core)
//!
//! The interactive stdin command loop: `add`/`remove`/`list`/`exit`.
//! Deliberately the thinnest layer the spec allows — whitespace
//! splitting, not a shell grammar. Malformed input prints a usage
//! reminder and the loop keeps going; it never panics or exits the
//! process on bad input.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::state::{AddMappingError, ClientState};

const USAGE: &str = "commands: add <server_port> <client_addr> <client_port> | remove <server_port> | list | exit";

/// Runs until `exit` is entered or stdin reaches EOF.
pub async fn run(state: Arc<ClientState>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "error reading console input");
                break;
            }
        };
        if handle(&state, line.trim()).await {
            break;
        }
    }
}

/// Returns `true` when the console should stop (an `exit` command).
async fn handle(state: &Arc<ClientState>, line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("add") => {
            let (Some(port), Some(host), Some(target_port)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                println!("usage: add <server_port> <client_addr> <client_port>");
                return false;
            };
            let (Ok(port), Ok(target_port)) = (port.parse::<u16>(), target_port.parse::<u16>())
            else {
                println!("ports must be 0-65535");
                return false;
            };
            match state.add_mapping(port, host.to_string(), target_port).await {
                Ok(()) => state.send_command(format!("LISTEN {port} {host} {target_port}")),
                Err(AddMappingError::RegistryFull) => println!("mapping registry is full"),
            }
        }
        Some("remove") => {
            let Some(port) = tokens.next().and_then(|tok| tok.parse::<u16>().ok()) else {
                println!("usage: remove <server_port>");
                return false;
            };
            if state.remove_mapping(port).await {
                state.send_command(format!("CLOSE {port}"));
            } else {
                println!("no mapping for port {port}");
            }
        }
        Some("list") => {
            let mappings = state.list_mappings().await;
            if mappings.is_empty() {
                println!("(no mappings)");
            }
            for (port, mapping) in mappings {
                println!("{port} -> {}:{}", mapping.target_host, mapping.target_port);
            }
        }
        Some("exit") => return true,
        Some(other) => println!("unrecognized command '{other}'. {USAGE}"),
        None => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn state() -> (Arc<ClientState>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(ClientState::new(("127.0.0.1".to_string(), 7070), tx)),
            rx,
        )
    }

    #[tokio::test]
    async fn add_registers_mapping_and_queues_listen() {
        let (state, mut rx) = state();
        assert!(!handle(&state, "add 9000 127.0.0.1 80").await);

        assert!(state.lookup(9000).await.is_some());
        assert_eq!(rx.recv().await.unwrap(), "LISTEN 9000 127.0.0.1 80");
    }

    #[tokio::test]
    async fn remove_of_unknown_port_sends_no_close() {
        let (state, mut rx) = state();
        assert!(!handle(&state, "remove 9000").await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_of_known_port_queues_close() {
        let (state, mut rx) = state();
        handle(&state, "add 9000 127.0.0.1 80").await;
        rx.recv().await.unwrap(); // drain the LISTEN

        assert!(!handle(&state, "remove 9000").await);
        assert_eq!(rx.recv().await.unwrap(), "CLOSE 9000");
        assert!(state.lookup(9000).await.is_none());
    }

    #[tokio::test]
    async fn exit_stops_the_loop() {
        let (state, _rx) = state();
        assert!(handle(&state, "exit").await);
    }

    #[tokio::test]
    async fn malformed_add_is_ignored_not_panicking() {
        let (state, mut rx) = state();
        assert!(!handle(&state, "add notaport").await);
        assert!(rx.try_recv().is_err());
        assert!(!handle(&state, "bogus command").await);
    }
}
