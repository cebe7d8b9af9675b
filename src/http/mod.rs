//! HTTP request/response pipeline for a single connection.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine driving the stages below
//! - **`parser`**: reads the header block and extracts the requested path
//! - **`request`**: classification of individual request lines
//! - **`target`**: maps a requested path onto the document root
//! - **`mime`**: content type detection based on file extensions
//! - **`response`**: status codes, the ordered header set, fixed snippets
//! - **`writer`**: serializes and writes the header block
//! - **`template`**: placeholder substitution for served HTML
//! - **`content`**: picks and writes the response body
//!
//! # Connection State Machine
//!
//! Every connection serves one request and then closes:
//!
//! ```text
//!        ┌─────────────────┐
//!        │  ParseRequest   │ ← Read header lines up to the blank line
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │  ResolveTarget  │ ← Document root + path, content type
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │   WriteHeader   │ ← Status line, Date, Server, Connection, Content-Type
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │    EmitBody     │ ← Front page, template, raw image or 404
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │      Flush      │
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │      Close      │ ← Also reached directly from any failed stage
//!        └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wwwworker::config::SiteConfig;
//! use wwwworker::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let site = Arc::new(SiteConfig::default());
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let site = Arc::clone(&site);
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, site).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod content;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod target;
pub mod template;
pub mod writer;
