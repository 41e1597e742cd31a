use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Correlates a pending externally-accepted socket with the client-initiated
/// data channel that will eventually claim it (§3, §GLOSSARY).
///
/// A thin newtype rather than a bare `u64` so the wire format (decimal
/// ASCII) and the in-memory key used by the pending table can't drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(value: u64) -> Self {
        SessionId(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(SessionId)
    }
}

/// Mints session ids that are strictly monotonically increasing and never
/// reused within a server run (§3 invariant). Allocation is a single atomic
/// increment, matching the `InterlockedIncrement` counter of the source —
/// no lock is needed to hand out an id.
#[derive(Debug, Default)]
pub struct SessionIdAllocator(AtomicU64);

impl SessionIdAllocator {
    pub fn new() -> Self {
        SessionIdAllocator(AtomicU64::new(0))
    }

    /// Returns the next id, starting at 1.
    pub fn next(&self) -> SessionId {
        SessionId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically_and_never_repeat() {
        let alloc = SessionIdAllocator::new();
        let ids: Vec<SessionId> = (0..5).map(|_| alloc.next()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        let sid = SessionId::new(42);
        let text = sid.to_string();
        assert_eq!(text, "42");
        assert_eq!(text.parse::<SessionId>().unwrap(), sid);
    }
}
