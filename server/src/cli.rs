use clap::Parser;

/// Startup arguments for the relay server.
#[derive(Debug, Parser)]
#[command(name = "tunnel-server", about = "Reverse TCP tunnel relay server")]
pub struct Args {
    /// Address to bind the control listener on.
    #[arg(default_value = "0.0.0.0")]
    pub listen_addr: String,

    /// Port to bind the control listener on.
    pub listen_port: u16,

    /// Log level forwarded to the tracing subscriber's filter.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
