//! # mcplink Subprocess Transport
//!
//! Runs an MCP server as a child process and speaks newline-delimited
//! JSON-RPC over its stdin/stdout. The child is spawned lazily on the
//! first request, handshaken with a fixed protocol version, and killed
//! when the transport is closed or dropped.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

mod transport;

pub use transport::{PROTOCOL_VERSION, SubprocessTransport};
