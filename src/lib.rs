//! wwwworker - single-request HTTP responder
//!
//! Core library: one accepted connection in, one templated page or static
//! asset out.

pub mod config;
pub mod http;
pub mod server;
