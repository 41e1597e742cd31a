//! # Tunnel Relay Server
//!
//! A reverse TCP port-forwarder's public-facing half. It exposes ports on
//! this host that, once connected to by external clients, are stitched
//! into a bidirectional byte pipe through a single outward-dialed
//! controller and dynamically spawned data channels (§1, §2).
//!
//! ## Architecture
//!
//! ```text
//! external client ──TCP──► tunnel listener ──► pending table
//!                                                    │
//! controller (outward from client) ◄────OPEN sid────┘
//!                                                    │
//! data channel (outward from client) ──DATA sid──► relay ──► external
//! ```
//!
//! ## Modules
//!
//! - [`acceptor`]   — the control listener and first-line dispatch
//! - [`controller`] — the single active controller session
//! - [`tunnel`]     — per-port tunnel registry and accept loops
//! - [`state`]      — shared registries (tunnels, pending table, controller slot)
//! - [`cli`]        — startup arguments

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tunnel_server::cli;
use tunnel_server::state::ServerState;
use tunnel_server::acceptor;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tunnel_server={}", args.log_level).into()),
        )
        .init();

    let state = Arc::new(ServerState::new());

    let addr = format!("{}:{}", args.listen_addr, args.listen_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind control listener on {addr}"))?;
    info!(%addr, "tunnel server listening");

    acceptor::run(state, listener).await;
    Ok(())
}
