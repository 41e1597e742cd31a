use tokio::io::{copy_bidirectional_with_sizes, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::constants::RELAY_BUF_SIZE;
use crate::line::LineStream;

/// Splices two already-raw sockets together until either side closes
/// (§4.8). `copy_bidirectional_with_sizes` runs both directions
/// concurrently in the caller's task, bounds each read to `RELAY_BUF_SIZE`,
/// loops over short writes, and shuts both streams down the moment either
/// side hits EOF or an error — exactly the invariants this pairing must
/// uphold (no silently dropped bytes, no partial write treated as
/// success, both sockets closed exactly once).
pub async fn relay_pair(mut a: TcpStream, mut b: TcpStream) {
    match copy_bidirectional_with_sizes(&mut a, &mut b, RELAY_BUF_SIZE, RELAY_BUF_SIZE).await {
        Ok((a_to_b, b_to_a)) => debug!(a_to_b, b_to_a, "relay pair finished"),
        Err(err) => debug!(%err, "relay pair ended with an error"),
    }
}

/// Same as [`relay_pair`], but `stream` is a line-framed connection that
/// was just read from to identify it (its `DATA <sid>` line). Whatever
/// bytes the framed reader had already buffered past that line — sent
/// pipelined in the same packet — are flushed into `other` before the
/// splice starts, so nothing the far end sent early is lost.
pub async fn relay_framed(stream: LineStream<TcpStream>, mut other: TcpStream) {
    let parts = stream.into_parts();
    if !parts.read_buf.is_empty() {
        if let Err(err) = other.write_all(&parts.read_buf).await {
            debug!(%err, "failed flushing pipelined bytes before relay");
            return;
        }
    }
    let mut io = parts.io;
    match copy_bidirectional_with_sizes(&mut io, &mut other, RELAY_BUF_SIZE, RELAY_BUF_SIZE).await {
        Ok((a_to_b, b_to_a)) => debug!(a_to_b, b_to_a, "relay pair finished"),
        Err(err) => debug!(%err, "relay pair ended with an error"),
    }
}
