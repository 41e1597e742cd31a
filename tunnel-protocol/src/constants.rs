//! Compiled-in bounds from the design's §6 "Bounds" table.
//!
//! None of these are user-configurable; they mirror the constants the
//! original single-client implementation hard-coded.

/// Maximum accepted line length, in bytes, for any line-framed read
/// (control commands, `DATA <sid>`, `OPEN <sid> <port>`).
pub const MAX_LINE_LEN: usize = 512;

/// Read buffer size used by each relay direction.
pub const RELAY_BUF_SIZE: usize = 4096;

/// Maximum number of simultaneously active server-side tunnels.
pub const MAX_TUNNELS: usize = 64;

/// Maximum number of mappings the client mapping registry holds.
pub const MAX_MAPPINGS: usize = 128;

/// Minimum listen backlog for tunnel and control listeners. Tokio's
/// `TcpListener` does not expose a backlog knob; the platform default
/// already exceeds this, so the constant exists to document the bound
/// rather than to configure anything.
pub const LISTEN_BACKLOG: i32 = 10;
