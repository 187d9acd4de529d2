//! Per-server transport pooling.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use mcplink_transport::{ServerConfig, Transport, TransportResult};

use crate::factory::make_transport;

/// Keyed cache of one transport per server name.
///
/// The pool never re-validates a cached entry against the configuration
/// passed to a later `get`: a second call with a different config for an
/// already-pooled name silently returns the cached transport. Evict with
/// [`forget`](Self::forget) to pick up new configuration.
#[derive(Debug, Default)]
pub struct TransportPool {
    transports: RwLock<HashMap<String, Arc<dyn Transport>>>,
}

impl TransportPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pooled transport for `name`, constructing and caching
    /// one from `config` on first use.
    pub async fn get(
        &self,
        name: &str,
        config: &ServerConfig,
    ) -> TransportResult<Arc<dyn Transport>> {
        if let Some(transport) = self.transports.read().await.get(name) {
            return Ok(Arc::clone(transport));
        }

        let mut transports = self.transports.write().await;
        // Another caller may have raced us between the locks.
        if let Some(transport) = transports.get(name) {
            return Ok(Arc::clone(transport));
        }

        debug!(server = name, "constructing pooled transport");
        let transport = make_transport(config)?;
        transports.insert(name.to_string(), Arc::clone(&transport));
        Ok(transport)
    }

    /// Evict `name`, closing the transport's resources first.
    pub async fn forget(&self, name: &str) -> TransportResult<()> {
        let removed = self.transports.write().await.remove(name);
        if let Some(transport) = removed {
            debug!(server = name, "evicting pooled transport");
            transport.close().await?;
        }
        Ok(())
    }

    /// Evict everything, closing each transport.
    pub async fn clear(&self) -> TransportResult<()> {
        let drained: Vec<_> = self.transports.write().await.drain().collect();
        for (name, transport) in drained {
            debug!(server = %name, "evicting pooled transport");
            transport.close().await?;
        }
        Ok(())
    }

    /// Names of the currently pooled servers, in no particular order.
    pub async fn active_servers(&self) -> Vec<String> {
        self.transports.read().await.keys().cloned().collect()
    }
}
