use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::mime::ContentType;
use crate::http::response::{ResponseHead, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Every header line ends with a bare newline; the block ends with a second.
const LINE_END: &[u8] = b"\n";

pub fn serialize_head(head: &ResponseHead) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    // Status line
    let status_line = format!(
        "{} {} {}",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());
    buf.extend_from_slice(LINE_END);

    // Headers
    for (k, v) in &head.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(LINE_END);
    }

    // Header/body separator
    buf.extend_from_slice(LINE_END);

    buf
}

/// Writes the complete header block for a response.
///
/// The status is `200 OK` when `target_exists`, otherwise `404 Not Found`.
pub async fn write_header<W>(
    stream: &mut W,
    content_type: ContentType,
    target_exists: bool,
    server_name: &str,
) -> anyhow::Result<StatusCode>
where
    W: AsyncWrite + Unpin,
{
    let status = StatusCode::for_target(target_exists);
    let head = ResponseHead::new(status, content_type, server_name);

    stream.write_all(&serialize_head(&head)).await?;
    Ok(status)
}

/// Writes all of `buf`, failing only when a single write makes no progress
/// within `deadline`.
///
/// A slow reader that keeps draining the stream never trips the deadline;
/// a stalled one does.
pub async fn write_all_within<W>(
    stream: &mut W,
    buf: &[u8],
    deadline: Duration,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < buf.len() {
        let n = timeout(deadline, stream.write(&buf[written..]))
            .await
            .context("timed out writing body")??;

        if n == 0 {
            return Err(anyhow::anyhow!("connection closed while writing"));
        }

        written += n;
    }

    Ok(())
}
