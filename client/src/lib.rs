//! Reverse TCP tunnel client, as a library so integration tests can drive
//! the controller/session/console machinery directly over real sockets
//! bound to ephemeral ports (§9 Test tooling).
//!
//! ## Modules
//!
//! - [`controller`] — the outward control connection: reader + writer
//! - [`session`]    — the session opener, run once per `OPEN` notice
//! - [`state`]      — the Mapping registry
//! - [`console`]    — the interactive stdin command loop (ambient)
//! - [`cli`]        — startup arguments (ambient)

pub mod cli;
pub mod console;
pub mod controller;
pub mod session;
pub mod state;
