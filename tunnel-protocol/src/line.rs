use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, FramedParts, LinesCodec, LinesCodecError};

use crate::constants::MAX_LINE_LEN;
use crate::error::TunnelError;

/// A connection framed as LF-terminated text lines, CR trimmed, bounded to
/// `MAX_LINE_LEN` bytes per line (§4.1). Every socket in this system starts
/// life as one of these — the server never knows what a freshly accepted
/// connection is until it reads the first line off it.
pub type LineStream<T> = Framed<T, LinesCodec>;

/// Outcome of one `recv_line` call: a complete line or a clean end of
/// stream. An unterminated line still sitting in the buffer when the peer
/// closes is delivered once as a final line rather than dropped, matching
/// `LinesCodec`'s own `decode_eof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Data(String),
    Eof,
}

/// Wraps a raw socket in the shared line framing.
pub fn frame<T>(io: T) -> LineStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    Framed::new(io, LinesCodec::new_with_max_length(MAX_LINE_LEN))
}

pub async fn recv_line<T>(stream: &mut LineStream<T>) -> Result<Line, TunnelError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    match stream.next().await {
        None => Ok(Line::Eof),
        Some(Ok(line)) => Ok(Line::Data(line)),
        Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
            Err(TunnelError::LineTooLong(MAX_LINE_LEN))
        }
        Some(Err(LinesCodecError::Io(err))) => Err(TunnelError::Io(err)),
    }
}

/// Sends one line; the codec appends the trailing `\n`.
pub async fn send_line<T>(stream: &mut LineStream<T>, line: impl Into<String>) -> Result<(), TunnelError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    stream.send(line.into()).await.map_err(|err| match err {
        LinesCodecError::MaxLineLengthExceeded => TunnelError::LineTooLong(MAX_LINE_LEN),
        LinesCodecError::Io(err) => TunnelError::Io(err),
    })
}

/// Tears a [`LineStream`] back down into its raw socket and whatever bytes
/// the codec had already buffered past the last decoded line. Used when a
/// connection stops being line-oriented and becomes a raw relay (§4.8).
pub fn into_parts<T>(stream: LineStream<T>) -> FramedParts<T, LinesCodec> {
    stream.into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    fn pair() -> (LineStream<DuplexStream>, DuplexStream) {
        let (a, b) = tokio::io::duplex(256);
        (frame(a), b)
    }

    #[tokio::test]
    async fn reads_lf_terminated_line() {
        let (mut framed, mut raw) = pair();
        raw.write_all(b"LISTEN 9000\n").await.unwrap();
        assert_eq!(
            recv_line(&mut framed).await.unwrap(),
            Line::Data("LISTEN 9000".to_string())
        );
    }

    #[tokio::test]
    async fn trims_trailing_cr() {
        let (mut framed, mut raw) = pair();
        raw.write_all(b"CLOSE 9000\r\n").await.unwrap();
        assert_eq!(
            recv_line(&mut framed).await.unwrap(),
            Line::Data("CLOSE 9000".to_string())
        );
    }

    #[tokio::test]
    async fn empty_input_is_eof() {
        let (mut framed, raw) = pair();
        drop(raw);
        assert_eq!(recv_line(&mut framed).await.unwrap(), Line::Eof);
    }

    #[tokio::test]
    async fn partial_line_at_close_is_delivered_once() {
        let (mut framed, mut raw) = pair();
        raw.write_all(b"DATA 4").await.unwrap();
        drop(raw);
        assert_eq!(
            recv_line(&mut framed).await.unwrap(),
            Line::Data("DATA 4".to_string())
        );
        assert_eq!(recv_line(&mut framed).await.unwrap(), Line::Eof);
    }

    #[tokio::test]
    async fn overlong_line_is_an_error() {
        let (mut framed, mut raw) = pair();
        let mut input = vec![b'a'; 600];
        input.push(b'\n');
        raw.write_all(&input).await.unwrap();
        assert!(matches!(
            recv_line(&mut framed).await,
            Err(TunnelError::LineTooLong(MAX_LINE_LEN))
        ));
    }

    #[tokio::test]
    async fn reads_multiple_lines_in_sequence() {
        let (mut framed, mut raw) = pair();
        raw.write_all(b"first\nsecond\n").await.unwrap();
        assert_eq!(
            recv_line(&mut framed).await.unwrap(),
            Line::Data("first".to_string())
        );
        assert_eq!(
            recv_line(&mut framed).await.unwrap(),
            Line::Data("second".to_string())
        );
    }

    #[tokio::test]
    async fn send_line_appends_newline() {
        let (mut framed, mut raw) = pair();
        send_line(&mut framed, "OPEN 1 9000").await.unwrap();
        let mut out = vec![0u8; 32];
        let n = raw.read(&mut out).await.unwrap();
        assert_eq!(&out[..n], b"OPEN 1 9000\n");
    }
}
