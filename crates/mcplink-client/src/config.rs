//! Client configuration: a named map of server configs, loadable from a
//! TOML/JSON/YAML file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use mcplink_transport::{ServerConfig, TransportError, TransportResult};

/// All servers this client knows about, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpClientConfig {
    /// Server name to transport configuration.
    #[serde(default)]
    pub servers: HashMap<String, ServerConfig>,
}

impl McpClientConfig {
    /// Load from a config file; the format is inferred from the
    /// extension.
    pub fn load(path: impl AsRef<Path>) -> TransportResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| TransportError::Configuration(e.to_string()))
    }

    /// Look up one server's configuration.
    pub fn server(&self, name: &str) -> TransportResult<&ServerConfig> {
        self.servers
            .get(name)
            .ok_or_else(|| TransportError::Configuration(format!("unknown server \"{name}\"")))
    }
}
