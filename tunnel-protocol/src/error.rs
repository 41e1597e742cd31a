/// Error taxonomy for the line-framing and command-parsing layer.
///
/// I/O errors from the underlying socket are folded in so `recv_line`
/// has a single error type to return; higher layers treat every variant
/// here as a protocol violation (§7): log and close the one connection
/// involved, never the whole process.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("line exceeds the {0}-byte limit")]
    LineTooLong(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
