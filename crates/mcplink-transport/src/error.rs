//! Transport error types.

use mcplink_wire::WireError;
use thiserror::Error;

/// A specialized `Result` type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Represents errors that can occur during transport operations.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum TransportError {
    /// The transport was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A subprocess server exited or failed before it could answer.
    #[error("Server startup failed: {0}")]
    StartupFailure(String),

    /// Communication with the server failed at the network or pipe level.
    #[error("Transport error during {action}: {cause}")]
    Transport {
        /// The MCP action being performed when the failure occurred.
        action: String,
        /// The underlying failure.
        cause: String,
    },

    /// The server's response did not decode as JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidResponse(String),

    /// The server answered with a JSON-RPC error object.
    #[error("JSON-RPC error: {message} (code {code})")]
    Rpc {
        /// Server-supplied error code (0 when absent).
        code: i64,
        /// Server-supplied error message.
        message: String,
    },

    /// No response with the expected id arrived within the deadline.
    #[error("Timeout after {secs} seconds waiting for response with id \"{id}\".")]
    Timeout {
        /// The configured timeout in whole seconds.
        secs: u64,
        /// The request id that went unanswered.
        id: String,
    },

    /// An SSE stream ended without delivering any result frame.
    #[error("Stream ended without a complete response")]
    IncompleteStream,
}

impl TransportError {
    /// Wrap a network or pipe failure with the action that triggered it.
    pub fn transport(action: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            action: action.into(),
            cause: cause.to_string(),
        }
    }
}

impl From<WireError> for TransportError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::InvalidResponse(msg) => Self::InvalidResponse(msg),
            WireError::Rpc { code, message } => Self::Rpc { code, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_names_secs_and_id() {
        let err = TransportError::Timeout {
            secs: 3,
            id: "7".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Timeout after 3 seconds waiting for response with id \"7\"."
        );
    }

    #[test]
    fn transport_names_the_action() {
        let err = TransportError::transport("tools/list", "connection refused");
        assert_eq!(
            err.to_string(),
            "Transport error during tools/list: connection refused"
        );
    }

    #[test]
    fn wire_errors_map_onto_the_taxonomy() {
        let err: TransportError = WireError::Rpc {
            code: -32601,
            message: "method not found".to_string(),
        }
        .into();
        assert!(matches!(err, TransportError::Rpc { code: -32601, .. }));

        let err: TransportError = WireError::InvalidResponse("bad".to_string()).into();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }
}
