use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::RequestLine;

/// Upper bound on the buffered header block.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

const READ_CHUNK: usize = 1024;

#[derive(Debug)]
pub enum ParseError {
    HeaderTooLarge,
    Io(std::io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::HeaderTooLarge => write!(f, "header block exceeds {} bytes", MAX_HEADER_BYTES),
            ParseError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Reads the request header block and returns the requested path.
///
/// Returns `None` when no `GET` line was seen, or when reading failed. Read
/// failures are logged and never retried.
pub async fn read_requested_path<R>(stream: &mut R, buf: &mut BytesMut) -> Option<String>
where
    R: AsyncRead + Unpin,
{
    match read_header_block(stream, buf).await {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "Request parsing aborted");
            None
        }
    }
}

/// Consumes header lines up to the blank line (or end of stream).
///
/// The first `GET` line decides the path; later lines are read and
/// discarded.
pub async fn read_header_block<R>(
    stream: &mut R,
    buf: &mut BytesMut,
) -> Result<Option<String>, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut path = None;
    let mut eof = false;

    loop {
        let line = match take_line(buf) {
            Some(line) => line,
            None if eof => {
                // The peer hung up mid-line: what is left is the last line.
                if buf.is_empty() {
                    break;
                }
                let rest = buf.split();
                String::from_utf8_lossy(&rest).into_owned()
            }
            None => {
                if buf.len() > MAX_HEADER_BYTES {
                    return Err(ParseError::HeaderTooLarge);
                }
                buf.reserve(READ_CHUNK);
                if stream.read_buf(buf).await? == 0 {
                    eof = true;
                }
                continue;
            }
        };

        tracing::debug!(line = %line, "Request line");

        if line.is_empty() {
            break;
        }

        if path.is_none() {
            let parsed = RequestLine::parse(&line);
            if parsed == RequestLine::Malformed {
                tracing::warn!(line = %line, "Malformed GET line, serving front page");
            }
            path = parsed.requested_path();
        }

        if eof && buf.is_empty() {
            break;
        }
    }

    Ok(path)
}

/// Splits one complete line off the front of `buf`.
///
/// Accepts both `\n` and `\r\n` terminators; the terminator is dropped.
pub fn take_line(buf: &mut BytesMut) -> Option<String> {
    let newline = buf.iter().position(|&b| b == b'\n')?;

    let mut end = newline;
    if end > 0 && buf[end - 1] == b'\r' {
        end -= 1;
    }

    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.advance(newline + 1);
    Some(line)
}
