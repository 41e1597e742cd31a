//! # Tunnel Client
//!
//! A reverse TCP port-forwarder's private-facing half. Dials out to the
//! server's control port, maintains the Mapping registry from exposed
//! server ports to private targets, and opens a fresh data channel plus
//! a dial to the private target for every `OPEN` the server sends (§1, §2).
//!
//! ## Architecture
//!
//! ```text
//! controller (outward, long-lived)  ◄──OPEN sid port── server
//!          │
//!          ▼
//! session opener ──DATA sid──► server   AND   ──► private target
//!          │                                          │
//!          └──────────────── relay ────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tunnel_client::controller`] — the control connection reader/writer
//! - [`tunnel_client::session`]    — session opener, per `OPEN` notice
//! - [`tunnel_client::state`]      — the Mapping registry
//! - [`tunnel_client::console`]    — the interactive stdin command loop
//! - [`tunnel_client::cli`]        — startup arguments

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::info;

use tunnel_client::cli;
use tunnel_client::state::ClientState;
use tunnel_client::{console, controller};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tunnel_client={}", args.log_level).into()),
        )
        .init();

    let server_addr = (args.server_host.clone(), args.server_port);
    let stream = TcpStream::connect((args.server_host.as_str(), args.server_port))
        .await
        .with_context(|| format!("failed to connect to server at {}:{}", args.server_host, args.server_port))?;
    info!(host = %args.server_host, port = args.server_port, "connected to server");

    let (tx, rx) = mpsc::unbounded_channel();
    let state = Arc::new(ClientState::new(server_addr, tx));

    let controller_task = tokio::spawn(controller::run(state.clone(), stream, rx));
    let console_task = tokio::spawn(console::run(state));

    tokio::select! {
        _ = controller_task => info!("controller connection ended"),
        _ = console_task => info!("console exited"),
    }

    Ok(())
}
