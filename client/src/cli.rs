use clap::Parser;

/// Startup arguments for the tunnel client.
#[derive(Debug, Parser)]
#[command(name = "tunnel-client", about = "Reverse TCP tunnel client")]
pub struct Args {
    /// Host of the tunnel server's control listener.
    pub server_host: String,

    /// Port of the tunnel server's control listener.
    pub server_port: u16,

    /// Log level forwarded to the tracing subscriber's filter.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
