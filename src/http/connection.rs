use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::SiteConfig;
use crate::http::content;
use crate::http::parser;
use crate::http::response::StatusCode;
use crate::http::target::ResolvedTarget;
use crate::http::template::TemplateEngine;
use crate::http::writer;

/// Handles exactly one request on one accepted stream.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    site: Arc<SiteConfig>,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    ParseRequest,
    ResolveTarget {
        path: String,
    },
    WriteHeader {
        path: String,
        target: ResolvedTarget,
    },
    EmitBody {
        path: String,
        target: ResolvedTarget,
        status: StatusCode,
    },
    Flush,
    Close,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<SiteConfig>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            site,
            state: ConnectionState::ParseRequest,
        }
    }

    /// Runs the request through to completion and closes the stream.
    ///
    /// The stream is shut down on every path, including errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let deadline = self.site.io_timeout();
        let result = self.drive(deadline).await;
        self.close(deadline).await;
        result
    }

    async fn drive(&mut self, deadline: Duration) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Close);

            self.state = match state {
                ConnectionState::ParseRequest => {
                    let path = timeout(
                        deadline,
                        parser::read_requested_path(&mut self.stream, &mut self.buffer),
                    )
                    .await
                    .context("timed out reading request")?;

                    // No GET line at all is served like a malformed one.
                    ConnectionState::ResolveTarget {
                        path: path.unwrap_or_default(),
                    }
                }

                ConnectionState::ResolveTarget { path } => {
                    let target = ResolvedTarget::resolve(&self.site.document_root, &path);
                    tracing::debug!(
                        path = %path,
                        file = %target.absolute_path.display(),
                        exists = target.exists,
                        content_type = %target.content_type,
                        "Resolved target"
                    );
                    ConnectionState::WriteHeader { path, target }
                }

                ConnectionState::WriteHeader { path, target } => {
                    let status = timeout(
                        deadline,
                        writer::write_header(
                            &mut self.stream,
                            target.content_type,
                            target.exists,
                            &self.site.server_name,
                        ),
                    )
                    .await
                    .context("timed out writing header")??;

                    ConnectionState::EmitBody {
                        path,
                        target,
                        status,
                    }
                }

                ConnectionState::EmitBody {
                    path,
                    target,
                    status,
                } => {
                    let template = TemplateEngine::new(self.site.template_server_name.as_str());
                    // Deadline is per write inside `emit`, not per body.
                    let bytes =
                        content::emit(&mut self.stream, &path, &target, &template, deadline)
                            .await?;

                    tracing::info!(
                        path = %path,
                        status = status.as_u16(),
                        content_type = %target.content_type,
                        bytes,
                        "Served request"
                    );
                    ConnectionState::Flush
                }

                ConnectionState::Flush => {
                    timeout(deadline, self.stream.flush())
                        .await
                        .context("timed out flushing response")??;
                    ConnectionState::Close
                }

                ConnectionState::Close => return Ok(()),
            };
        }
    }

    async fn close(&mut self, deadline: Duration) {
        match timeout(deadline, self.stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Shutdown failed"),
            Err(_) => tracing::debug!("Timed out shutting down stream"),
        }
    }
}
