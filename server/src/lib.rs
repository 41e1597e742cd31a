//! Reverse TCP tunnel relay server, as a library so integration tests can
//! drive the acceptor/controller/tunnel machinery directly over real
//! sockets bound to ephemeral ports (§9 Test tooling).

pub mod acceptor;
pub mod cli;
pub mod controller;
pub mod state;
pub mod tunnel;
