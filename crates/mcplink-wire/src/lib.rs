//! # mcplink Wire Codec
//!
//! JSON-RPC 2.0 envelope encoding and decoding for the mcplink MCP client.
//! This crate builds request envelopes (including request-id generation) and
//! extracts results or errors from response payloads. It performs no I/O.
//!
//! ## Id generation
//!
//! HTTP transports draw a uniform random id in `[1, 1_000_000]` per call,
//! encoded as an integer or a string depending on [`IdEncoding`]. The
//! subprocess transport uses a simple incrementing counter starting at 1,
//! always encoded as a string.
//!
//! ## Response parsing
//!
//! [`parse_response`] is deliberately tolerant: a decoded object without a
//! `result` key is returned whole, so servers that omit the JSON-RPC
//! envelope still work. An `error` key always wins and surfaces as
//! [`WireError::Rpc`].

#![warn(missing_docs, rust_2018_idioms, clippy::all)]
#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The JSON-RPC protocol version sent in every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Upper bound (inclusive) of randomly generated request ids.
pub const MAX_RANDOM_ID: i64 = 1_000_000;

/// A specialized `Result` type for codec operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors produced while decoding a JSON-RPC response payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The payload did not decode as JSON.
    #[error("invalid JSON response: {0}")]
    InvalidResponse(String),

    /// The server returned a JSON-RPC `error` object.
    #[error("JSON-RPC error: {message} (code {code})")]
    Rpc {
        /// Server-supplied error code (0 when absent).
        code: i64,
        /// Server-supplied error message.
        message: String,
    },
}

/// How generated request ids are encoded on the wire.
///
/// Some servers insist on numeric ids, others on strings; the original
/// protocol leaves both legal, so this is a per-server configuration knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdEncoding {
    /// Encode ids as JSON numbers (default).
    #[default]
    Int,
    /// Encode ids as JSON strings.
    String,
}

/// A JSON-RPC request id, either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id.
    Number(i64),
    /// String id.
    String(String),
}

impl RequestId {
    /// Draw a uniform random id in `[1, MAX_RANDOM_ID]`, encoded per `mode`.
    pub fn random(mode: IdEncoding) -> Self {
        let id = fastrand::i64(1..=MAX_RANDOM_ID);
        match mode {
            IdEncoding::Int => Self::Number(id),
            IdEncoding::String => Self::String(id.to_string()),
        }
    }

    /// Returns `true` if this id equals the `id` field of a decoded message.
    ///
    /// Comparison is by JSON value, so `"42"` and `42` stay distinct.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Number(n), Value::Number(v)) => v.as_i64() == Some(*n),
            (Self::String(s), Value::String(v)) => s == v,
            _ => false,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// The method (MCP action) being invoked.
    pub method: String,
    /// Request parameters. Absent params encode as `{}`, never `null`,
    /// to stay compatible with strict servers.
    pub params: Value,
    /// Correlation id, unique within one transport instance.
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Build a request envelope for `method` with the given id.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: params.unwrap_or_else(empty_params),
            id,
        }
    }

    /// Serialize to a compact JSON byte vector.
    pub fn to_bytes(&self) -> WireResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| WireError::InvalidResponse(e.to_string()))
    }

    /// Serialize to a single newline-terminated line (stdio framing).
    pub fn to_line(&self) -> WireResult<String> {
        let mut line =
            serde_json::to_string(self).map_err(|e| WireError::InvalidResponse(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

/// A JSON-RPC notification: a request without an id, expecting no response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// The notification method.
    pub method: String,
    /// Notification parameters, `{}` when absent.
    pub params: Value,
}

impl JsonRpcNotification {
    /// Build a notification envelope for `method`.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: params.unwrap_or_else(empty_params),
        }
    }

    /// Serialize to a single newline-terminated line (stdio framing).
    pub fn to_line(&self) -> WireResult<String> {
        let mut line =
            serde_json::to_string(self).map_err(|e| WireError::InvalidResponse(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

/// Sequential request-id generator for the subprocess transport.
///
/// Ids start at 1 and are always encoded as strings, matching the wire
/// behavior MCP stdio servers expect from this client.
#[derive(Debug, Default)]
pub struct SequentialId {
    next: u64,
}

impl SequentialId {
    /// Create a generator whose first id is `"1"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> RequestId {
        self.next += 1;
        RequestId::String(self.next.to_string())
    }
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Surface a JSON-RPC `error` object as [`WireError::Rpc`], if present.
pub fn check_error(message: &Value) -> WireResult<()> {
    if let Some(error) = message.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown JSON-RPC error")
            .to_string();
        return Err(WireError::Rpc { code, message });
    }
    Ok(())
}

/// Extract the result (or error) from a decoded JSON-RPC message value.
///
/// Rules, in order:
/// - an `error` key surfaces as [`WireError::Rpc`] with the server code
///   (0 when absent);
/// - a `result` key yields its value;
/// - otherwise the whole object is the result (envelope-less servers).
pub fn extract_result(message: Value) -> WireResult<Value> {
    check_error(&message)?;

    match message {
        Value::Object(mut obj) => match obj.remove("result") {
            Some(result) => Ok(result),
            None => Ok(Value::Object(obj)),
        },
        other => Ok(other),
    }
}

/// Decode a raw response payload and extract its result per
/// [`extract_result`].
pub fn parse_response(payload: &[u8]) -> WireResult<Value> {
    let message: Value = serde_json::from_slice(payload)
        .map_err(|e| WireError::InvalidResponse(e.to_string()))?;
    extract_result(message)
}
