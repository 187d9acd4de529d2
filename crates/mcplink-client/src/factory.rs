//! Transport construction from server configuration.

use std::sync::Arc;

use mcplink_http::{HttpTransport, StreamableHttpTransport};
use mcplink_stdio::SubprocessTransport;
use mcplink_transport::{ServerConfig, Transport, TransportResult};

/// Build the transport a [`ServerConfig`] names.
///
/// The configuration is validated first, so a bad config fails here
/// rather than on the first request.
pub fn make_transport(config: &ServerConfig) -> TransportResult<Arc<dyn Transport>> {
    config.validate()?;
    match config {
        ServerConfig::Http(http) => Ok(Arc::new(HttpTransport::new(http.clone())?)),
        ServerConfig::StreamableHttp(http) => {
            Ok(Arc::new(StreamableHttpTransport::new(http.clone())?))
        }
        ServerConfig::Stdio(stdio) => Ok(Arc::new(SubprocessTransport::new(stdio.clone())?)),
    }
}
