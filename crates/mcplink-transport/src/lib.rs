//! # mcplink Transport Core
//!
//! The transport abstraction all mcplink transports implement, together with
//! the shared error taxonomy and per-server configuration types.
//!
//! ## Overview
//!
//! This crate defines:
//! - **Trait**: [`Transport`] - one async `request` call per MCP action
//! - **Errors**: [`TransportError`], [`TransportResult`]
//! - **Config**: [`ServerConfig`] and its HTTP / stdio variants
//!
//! Transport implementations depend on this crate and implement [`Transport`]:
//!
//! ```rust,ignore
//! use mcplink_transport::{Transport, TransportResult};
//! use async_trait::async_trait;
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn request(&self, action: &str, params: Option<Value>) -> TransportResult<Value> {
//!         /* ... */
//!     }
//!     // ... other trait methods
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod config;
mod error;
mod traits;

pub use config::{
    DEFAULT_HTTP_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_STDIO_TIMEOUT_SECS,
    DEFAULT_STREAM_CHUNK_SIZE, HttpServerConfig, ServerConfig, StdioServerConfig,
};
pub use error::{TransportError, TransportResult};
pub use traits::{Transport, TransportKind};
