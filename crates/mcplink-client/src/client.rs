//! The client facade and per-server sessions.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use mcplink_transport::{Transport, TransportResult};

use crate::collection::Collection;
use crate::config::McpClientConfig;
use crate::pool::TransportPool;

/// High-level MCP client over a set of named servers.
///
/// Transports are pooled: connecting to the same server twice reuses the
/// same underlying connection/process.
#[derive(Debug)]
pub struct McpClient {
    config: McpClientConfig,
    pool: TransportPool,
}

impl McpClient {
    /// Build a client over an in-memory configuration.
    pub fn new(config: McpClientConfig) -> Self {
        Self {
            config,
            pool: TransportPool::new(),
        }
    }

    /// Build a client from a config file.
    pub fn load(path: impl AsRef<Path>) -> TransportResult<Self> {
        Ok(Self::new(McpClientConfig::load(path)?))
    }

    /// The loaded configuration.
    pub fn config(&self) -> &McpClientConfig {
        &self.config
    }

    /// Open (or reuse) a session with the named server.
    pub async fn connect(&self, name: &str) -> TransportResult<ServerSession> {
        let config = self.config.server(name)?;
        let transport = self.pool.get(name, config).await?;
        Ok(ServerSession {
            server: name.to_string(),
            transport,
        })
    }

    /// Drop the pooled transport for `name`, releasing its resources.
    pub async fn disconnect(&self, name: &str) -> TransportResult<()> {
        self.pool.forget(name).await
    }

    /// Drop every pooled transport.
    pub async fn disconnect_all(&self) -> TransportResult<()> {
        self.pool.clear().await
    }

    /// Names of servers with a live pooled transport.
    pub async fn active_servers(&self) -> Vec<String> {
        self.pool.active_servers().await
    }
}

/// One server's view of the MCP surface: tools and resources.
#[derive(Debug, Clone)]
pub struct ServerSession {
    server: String,
    transport: Arc<dyn Transport>,
}

impl ServerSession {
    /// The server name this session talks to.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// List the server's tools (`tools/list`).
    pub async fn tools(&self) -> TransportResult<Collection> {
        let result = self.transport.request("tools/list", None).await?;
        Ok(Self::unwrap_list(result, "tools"))
    }

    /// List the server's resources (`resources/list`).
    pub async fn resources(&self) -> TransportResult<Collection> {
        let result = self.transport.request("resources/list", None).await?;
        Ok(Self::unwrap_list(result, "resources"))
    }

    /// Invoke a tool (`tools/call`) and return the raw result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> TransportResult<Value> {
        debug!(server = %self.server, tool = name, "calling tool");
        let params = json!({
            "name": name,
            "arguments": arguments.unwrap_or_else(|| json!({})),
        });
        self.transport.request("tools/call", Some(params)).await
    }

    /// Unwrap `{"tools": [...]}`-shaped results. A bare array passes
    /// through; an envelope without the key is kept whole as one item.
    fn unwrap_list(result: Value, key: &str) -> Collection {
        let items = match result {
            Value::Object(mut obj) => match obj.remove(key) {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => vec![Value::Object(obj)],
            },
            Value::Array(items) => items,
            other => vec![other],
        };
        Collection::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unwrap_list_handles_the_common_shapes() {
        let wrapped = json!({"tools": [{"name": "echo"}]});
        assert_eq!(ServerSession::unwrap_list(wrapped, "tools").len(), 1);

        let bare = json!([{"name": "echo"}, {"name": "add"}]);
        assert_eq!(ServerSession::unwrap_list(bare, "tools").len(), 2);

        let missing = json!({"something": "else"});
        let passed_through = ServerSession::unwrap_list(missing, "tools");
        assert_eq!(passed_through.all(), &[json!({"something": "else"})]);
    }
}
