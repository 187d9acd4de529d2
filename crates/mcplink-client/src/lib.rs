//! # mcplink Client
//!
//! The user-facing surface of mcplink: a [`McpClient`] that loads a map of
//! named server configurations, pools one transport per server, and hands
//! out [`ServerSession`]s for listing tools and resources and invoking
//! tools.
//!
//! ```rust,ignore
//! let client = McpClient::load("mcp.toml")?;
//! let session = client.connect("everything").await?;
//! for tool in session.tools().await?.iter() {
//!     println!("{}", tool["name"]);
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
#![allow(clippy::module_name_repetitions)]

mod client;
mod collection;
mod config;
mod factory;
mod pool;

pub use client::{McpClient, ServerSession};
pub use collection::Collection;
pub use config::McpClientConfig;
pub use factory::make_transport;
pub use pool::TransportPool;
