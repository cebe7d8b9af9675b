//! Response body emission.

use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, BufReader};

use crate::http::response::{FRONT_PAGE_BODY, NOT_FOUND_BODY};
use crate::http::target::ResolvedTarget;
use crate::http::template::TemplateEngine;
use crate::http::writer::write_all_within;

/// Expanded template lines are collected up to this size before a write.
pub const BATCH_BYTES: usize = 8 * 1024;

const COPY_CHUNK: usize = 8 * 1024;

/// Which body a response carries. Rules are checked top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Empty requested path.
    FrontPage,
    /// Existing HTML target, expanded line by line.
    Templated,
    /// Existing image target, copied byte for byte.
    Passthrough,
    NotFound,
}

impl BodyKind {
    pub fn select(requested_path: &str, target: &ResolvedTarget) -> Self {
        if requested_path.is_empty() {
            BodyKind::FrontPage
        } else if !target.exists {
            BodyKind::NotFound
        } else if target.content_type.is_image() {
            BodyKind::Passthrough
        } else {
            BodyKind::Templated
        }
    }
}

/// Writes the body for `target` and returns the number of bytes written.
///
/// `deadline` bounds each socket write, not the whole body. File read
/// failures are returned as-is; whatever was already written stays written.
pub async fn emit<W>(
    stream: &mut W,
    requested_path: &str,
    target: &ResolvedTarget,
    template: &TemplateEngine,
    deadline: Duration,
) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    match BodyKind::select(requested_path, target) {
        BodyKind::FrontPage => write_snippet(stream, FRONT_PAGE_BODY, deadline).await,
        BodyKind::NotFound => write_snippet(stream, NOT_FOUND_BODY, deadline).await,
        BodyKind::Templated => emit_templated(stream, target, template, deadline).await,
        BodyKind::Passthrough => emit_passthrough(stream, target, deadline).await,
    }
}

async fn write_snippet<W>(stream: &mut W, snippet: &[u8], deadline: Duration) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    write_all_within(stream, snippet, deadline).await?;
    Ok(snippet.len() as u64)
}

/// Lines are written without their terminators and with nothing in between.
async fn emit_templated<W>(
    stream: &mut W,
    target: &ResolvedTarget,
    template: &TemplateEngine,
    deadline: Duration,
) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let file = File::open(&target.absolute_path)
        .await
        .with_context(|| format!("failed to open {}", target.absolute_path.display()))?;
    let mut reader = BufReader::new(file);

    let mut raw = Vec::new();
    let mut batch = BytesMut::with_capacity(BATCH_BYTES);
    let mut written = 0u64;

    loop {
        raw.clear();
        let n = reader
            .read_until(b'\n', &mut raw)
            .await
            .with_context(|| format!("failed to read {}", target.absolute_path.display()))?;
        if n == 0 {
            break;
        }

        if raw.last() == Some(&b'\n') {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        }

        let line = template.expand(&String::from_utf8_lossy(&raw));
        batch.extend_from_slice(line.as_bytes());

        if batch.len() >= BATCH_BYTES {
            write_all_within(stream, &batch, deadline).await?;
            written += batch.len() as u64;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        write_all_within(stream, &batch, deadline).await?;
        written += batch.len() as u64;
    }

    Ok(written)
}

async fn emit_passthrough<W>(
    stream: &mut W,
    target: &ResolvedTarget,
    deadline: Duration,
) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(&target.absolute_path)
        .await
        .with_context(|| format!("failed to open {}", target.absolute_path.display()))?;

    let mut chunk = vec![0u8; COPY_CHUNK];
    let mut copied = 0u64;

    loop {
        let n = file
            .read(&mut chunk)
            .await
            .with_context(|| format!("failed to read {}", target.absolute_path.display()))?;
        if n == 0 {
            break;
        }

        write_all_within(stream, &chunk[..n], deadline).await?;
        copied += n as u64;
    }

    Ok(copied)
}
