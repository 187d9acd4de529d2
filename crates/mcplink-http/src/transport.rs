//! HTTP transport implementations.

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client as HttpClient, Response, header};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::sync::{Mutex, RwLock};
use tokio_util::io::StreamReader;
use tracing::{debug, info};

use mcplink_transport::{
    HttpServerConfig, Transport, TransportError, TransportKind, TransportResult,
};
use mcplink_wire::{JsonRpcRequest, RequestId};

use crate::sse::SseParser;

/// Session sentinel used until the server hands out a real session id.
const DEFAULT_SESSION_ID: &str = "1";

const SESSION_HEADER: &str = "mcp-session-id";

/// Shared session machinery for both HTTP transports.
#[derive(Debug)]
struct HttpCore {
    config: HttpServerConfig,
    http_client: HttpClient,

    /// Session id echoed on every call, `"1"` until the handshake
    /// captures a server-issued one.
    session_id: RwLock<String>,

    /// Handshake guard. Held across the whole `initialize` exchange so
    /// concurrent first calls trigger exactly one handshake.
    initialized: Mutex<bool>,
}

impl HttpCore {
    fn new(config: HttpServerConfig) -> TransportResult<Self> {
        // Must explicitly select rustls because cargo features are additive
        // and other dependencies may bring in native-tls.
        let http_client = HttpClient::builder()
            .use_rustls_tls()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            session_id: RwLock::new(DEFAULT_SESSION_ID.to_string()),
            initialized: Mutex::new(false),
        })
    }

    /// Default headers plus custom ones, custom winning. A configured
    /// `Authorization` header overrides the bearer token.
    fn build_headers(&self, accept: &str) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();

        if let Ok(accept_value) = header::HeaderValue::from_str(accept) {
            headers.insert(header::ACCEPT, accept_value);
        }
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(token) = &self.config.token
            && let Ok(auth_value) = header::HeaderValue::from_str(&format!("Bearer {token}"))
        {
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        for (key, value) in &self.config.headers {
            if let (Ok(k), Ok(v)) = (
                header::HeaderName::from_bytes(key.as_bytes()),
                header::HeaderValue::from_str(value),
            ) {
                headers.insert(k, v);
            }
        }

        headers
    }

    /// POST one envelope, attaching the current session id.
    async fn post(&self, accept: &str, request: &JsonRpcRequest) -> TransportResult<Response> {
        let mut headers = self.build_headers(accept);
        let session_id = self.session_id.read().await.clone();
        if let Ok(session_value) = header::HeaderValue::from_str(&session_id) {
            headers.insert(SESSION_HEADER, session_value);
        }

        let response = self
            .http_client
            .post(&self.config.base_url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::transport(&request.method, e))?;

        response
            .error_for_status()
            .map_err(|e| TransportError::transport(&request.method, e))
    }

    /// At most one `initialize` POST per transport instance.
    async fn ensure_session(&self, accept: &str) -> TransportResult<()> {
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            return Ok(());
        }

        let request = JsonRpcRequest::new(
            "initialize",
            None,
            RequestId::random(self.config.id_encoding),
        );
        let response = self.post(accept, &request).await?;

        if let Some(session_id) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            info!(session_id, url = %self.config.base_url, "MCP session established");
            *self.session_id.write().await = session_id.to_string();
        } else {
            debug!(url = %self.config.base_url, "server issued no session id, keeping sentinel");
        }

        *initialized = true;
        Ok(())
    }

    /// Drop the session so the next request re-initializes.
    async fn reset(&self) {
        let mut initialized = self.initialized.lock().await;
        *self.session_id.write().await = DEFAULT_SESSION_ID.to_string();
        *initialized = false;
    }
}

/// Unary JSON-RPC over HTTP POST: one request, one buffered JSON body.
#[derive(Debug)]
pub struct HttpTransport {
    core: HttpCore,
}

impl HttpTransport {
    /// Build a transport for `config`. No I/O happens until the first
    /// request.
    pub fn new(config: HttpServerConfig) -> TransportResult<Self> {
        Ok(Self {
            core: HttpCore::new(config)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, action: &str, params: Option<Value>) -> TransportResult<Value> {
        self.core.ensure_session("application/json").await?;

        let request = JsonRpcRequest::new(
            action,
            params,
            RequestId::random(self.core.config.id_encoding),
        );
        debug!(action, id = %request.id, "sending HTTP request");

        let response = self.core.post("application/json", &request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::transport(action, e))?;

        Ok(mcplink_wire::parse_response(&body)?)
    }

    async fn close(&self) -> TransportResult<()> {
        self.core.reset().await;
        Ok(())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }
}

/// HTTP POST transport whose responses may arrive as an SSE stream.
///
/// Requests advertise both `application/json` and `text/event-stream`;
/// the response `Content-Type` decides how the body is consumed.
#[derive(Debug)]
pub struct StreamableHttpTransport {
    core: HttpCore,
}

impl StreamableHttpTransport {
    /// Accept header advertised on every request.
    const ACCEPT: &'static str = "application/json, text/event-stream";

    /// Build a transport for `config`. No I/O happens until the first
    /// request.
    pub fn new(config: HttpServerConfig) -> TransportResult<Self> {
        Ok(Self {
            core: HttpCore::new(config)?,
        })
    }

    async fn consume_sse(&self, action: &str, response: Response) -> TransportResult<Value> {
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let mut reader = StreamReader::new(stream);
        let mut parser = SseParser::new();
        let mut chunk = vec![0u8; self.core.config.stream_chunk_size];

        loop {
            let n = reader
                .read(&mut chunk)
                .await
                .map_err(|e| TransportError::transport(action, e))?;
            if n == 0 {
                break;
            }
            parser.feed(&chunk[..n])?;
        }

        parser.finish()
    }
}

#[async_trait]
impl Transport for StreamableHttpTransport {
    async fn request(&self, action: &str, params: Option<Value>) -> TransportResult<Value> {
        self.core.ensure_session(Self::ACCEPT).await?;

        let request = JsonRpcRequest::new(
            action,
            params,
            RequestId::random(self.core.config.id_encoding),
        );
        debug!(action, id = %request.id, "sending streamable HTTP request");

        let response = self.core.post(Self::ACCEPT, &request).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("text/event-stream") {
            debug!(action, "consuming SSE response body");
            self.consume_sse(action, response).await
        } else {
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::transport(action, e))?;
            Ok(mcplink_wire::parse_response(&body)?)
        }
    }

    async fn close(&self) -> TransportResult<()> {
        self.core.reset().await;
        Ok(())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::StreamableHttp
    }
}
