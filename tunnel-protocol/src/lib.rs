//! Wire protocol shared by `tunnel-server` and `tunnel-client`.
//!
//! The rendezvous protocol is line-oriented ASCII text, CR-optional and
//! LF-terminated (§4.1 of the design). This crate owns the framing reader,
//! the session id type, and the handful of command/notice lines so the two
//! binaries can never drift apart on wire format.

mod constants;
mod error;
mod line;
mod message;
mod relay;
mod session;

pub use constants::{LISTEN_BACKLOG, MAX_LINE_LEN, MAX_MAPPINGS, MAX_TUNNELS, RELAY_BUF_SIZE};
pub use error::TunnelError;
pub use line::{frame, into_parts, recv_line, send_line, Line, LineStream};
pub use message::{classify_first_line, parse_control_command, ControlCommand, FirstLine, OpenNotice};
pub use relay::{relay_framed, relay_pair};
pub use session::{SessionId, SessionIdAllocator};
