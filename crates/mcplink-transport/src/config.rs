//! Per-server transport configuration.

use std::collections::HashMap;
use std::time::Duration;

use mcplink_wire::IdEncoding;
use serde::{Deserialize, Serialize};

use crate::error::{TransportError, TransportResult};

/// Endpoint URL used when an HTTP server config omits `base_url`.
pub const DEFAULT_HTTP_BASE_URL: &str = "http://localhost/api";

/// Default request timeout for HTTP transports, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default response timeout for subprocess transports, in seconds.
pub const DEFAULT_STDIO_TIMEOUT_SECS: u64 = 3;

/// Default streaming read chunk size, in bytes.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 8192;

/// Configuration for one MCP server, discriminated by transport type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerConfig {
    /// Unary JSON-RPC over HTTP POST.
    Http(HttpServerConfig),
    /// JSON-RPC over HTTP POST with SSE streaming responses.
    StreamableHttp(HttpServerConfig),
    /// JSON-RPC over a spawned subprocess's stdin/stdout.
    Stdio(StdioServerConfig),
}

impl ServerConfig {
    /// Validate the configuration, surfacing problems before any I/O.
    pub fn validate(&self) -> TransportResult<()> {
        match self {
            Self::Http(http) | Self::StreamableHttp(http) => {
                if http.base_url.trim().is_empty() {
                    return Err(TransportError::Configuration(
                        "base_url must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
            Self::Stdio(stdio) => {
                if stdio.command.is_empty() || stdio.command[0].trim().is_empty() {
                    return Err(TransportError::Configuration(
                        "command must name an executable".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Configuration shared by the unary and streaming HTTP transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Endpoint URL all requests are POSTed to. Falls back to
    /// [`DEFAULT_HTTP_BASE_URL`] when omitted.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout: u64,

    /// Optional bearer token, sent as `Authorization: Bearer <token>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Extra request headers. These win over the defaults, so a custom
    /// `Authorization` header overrides the bearer token.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Wire encoding of generated request ids.
    #[serde(default)]
    pub id_encoding: IdEncoding,

    /// Read chunk size for SSE streaming responses, in bytes.
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,
}

impl HttpServerConfig {
    /// Minimal config pointing at `base_url`, everything else defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            token: None,
            headers: HashMap::new(),
            id_encoding: IdEncoding::default(),
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
        }
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Configuration for the subprocess stdio transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioServerConfig {
    /// Command line to spawn: executable followed by its arguments.
    pub command: Vec<String>,

    /// Working directory for the child process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// Environment variables for the child. `PATH` is inherited from the
    /// parent when not set here.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Per-request response timeout in seconds.
    #[serde(default = "default_stdio_timeout")]
    pub timeout: u64,
}

impl StdioServerConfig {
    /// Minimal config spawning `command`, everything else defaulted.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            cwd: None,
            env: HashMap::new(),
            timeout: DEFAULT_STDIO_TIMEOUT_SECS,
        }
    }

    /// The response timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn default_base_url() -> String {
    DEFAULT_HTTP_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_stdio_timeout() -> u64 {
    DEFAULT_STDIO_TIMEOUT_SECS
}

fn default_stream_chunk_size() -> usize {
    DEFAULT_STREAM_CHUNK_SIZE
}
