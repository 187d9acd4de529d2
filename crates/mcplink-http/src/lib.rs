//! # mcplink HTTP Transports
//!
//! The two HTTP-based MCP transports:
//!
//! - [`HttpTransport`] - unary JSON-RPC over POST, one JSON body per call
//! - [`StreamableHttpTransport`] - same contract, but the server may answer
//!   with a `text/event-stream` body that is parsed incrementally
//!
//! Both establish a session lazily on the first request by POSTing an
//! `initialize` call and capturing the `mcp-session-id` response header.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod sse;
mod transport;

pub use sse::SseParser;
pub use transport::{HttpTransport, StreamableHttpTransport};
