//! The core transport trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportResult;

/// Discriminates the built-in transport implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Unary JSON-RPC over HTTP POST.
    Http,
    /// HTTP POST with SSE streaming responses.
    StreamableHttp,
    /// Spawned subprocess speaking line-delimited JSON.
    Stdio,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::StreamableHttp => write!(f, "streamable_http"),
            Self::Stdio => write!(f, "stdio"),
        }
    }
}

/// One MCP server connection.
///
/// Implementations own their session state (HTTP session ids, spawned
/// children) behind interior mutability, so a transport can be shared as
/// `Arc<dyn Transport>` and called concurrently.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Perform one MCP action and return its decoded result value.
    ///
    /// Any required session handshake happens lazily on the first call.
    /// `None` params are sent as an empty object.
    async fn request(&self, action: &str, params: Option<Value>) -> TransportResult<Value>;

    /// Release the connection's resources.
    ///
    /// Closing is idempotent; a closed transport re-establishes its session
    /// on the next `request`.
    async fn close(&self) -> TransportResult<()>;

    /// Which transport implementation this is.
    fn kind(&self) -> TransportKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_config_tags() {
        assert_eq!(TransportKind::Http.to_string(), "http");
        assert_eq!(TransportKind::StreamableHttp.to_string(), "streamable_http");
        assert_eq!(TransportKind::Stdio.to_string(), "stdio");
    }
}
