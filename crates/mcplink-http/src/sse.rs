//! Incremental Server-Sent Events parser.
//!
//! MCP streaming servers answer a POST with a `text/event-stream` body:
//! frames of `event:` / `data:` lines, terminated by a blank line. Each
//! frame carries one JSON-RPC message; the last message with a result
//! wins. `data: [DONE]` and empty data frames are keep-alive terminators
//! and yield nothing.

use mcplink_transport::{TransportError, TransportResult};
use mcplink_wire::WireError;
use serde_json::Value;
use tracing::debug;

/// Push parser for an SSE response body.
///
/// Feed it raw chunks with arbitrary boundaries via [`feed`](Self::feed);
/// a frame split across two chunks is reassembled. Call
/// [`finish`](Self::finish) when the stream ends to obtain the final
/// result.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    data: Vec<String>,
    result: Option<Value>,
}

impl SseParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk of the response body.
    ///
    /// Returns an error as soon as a frame carries a JSON-RPC `error`
    /// object or fails to decode as JSON; the caller should stop
    /// reading at that point.
    pub fn feed(&mut self, chunk: &[u8]) -> TransportResult<()> {
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            self.handle_line(line)?;
        }
        Ok(())
    }

    /// Flush any trailing frame and return the final result.
    ///
    /// A stream that ended without yielding any result frame is reported
    /// as [`TransportError::IncompleteStream`].
    pub fn finish(mut self) -> TransportResult<Value> {
        if !self.buffer.is_empty() {
            let trailing: Vec<u8> = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&trailing);
            self.handle_line(line.trim_end_matches(['\n', '\r']))?;
        }
        self.end_frame()?;
        self.result.take().ok_or(TransportError::IncompleteStream)
    }

    fn handle_line(&mut self, line: &str) -> TransportResult<()> {
        if line.is_empty() {
            return self.end_frame();
        }
        if let Some(rest) = line.strip_prefix(':') {
            debug!(comment = rest.trim_start(), "skipping SSE comment");
            return Ok(());
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        // "event:" and other fields carry no payload we care about
        Ok(())
    }

    fn end_frame(&mut self) -> TransportResult<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        let data = std::mem::take(&mut self.data).join("\n");
        if data.is_empty() || data == "[DONE]" {
            return Ok(());
        }

        let message = serde_json::from_str::<Value>(&data)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        match mcplink_wire::extract_result(message) {
            Ok(result) => {
                // Last result wins; earlier frames are incremental deltas.
                self.result = Some(result);
                Ok(())
            }
            Err(WireError::Rpc { code, message }) => {
                Err(TransportError::Rpc { code, message })
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn last_result_frame_wins_and_done_is_a_noop() {
        let mut parser = SseParser::new();
        parser
            .feed(b"data: {\"result\":{\"delta\":\"a\"}}\n\n")
            .unwrap();
        parser
            .feed(b"data: {\"result\":{\"final\":\"b\"}}\n\n")
            .unwrap();
        parser.feed(b"data: [DONE]\n\n").unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"final": "b"}));
    }

    #[test]
    fn frame_split_across_chunks_is_reassembled() {
        let mut parser = SseParser::new();
        parser.feed(b"data: {\"resu").unwrap();
        parser.feed(b"lt\":{\"x\":1}}\n").unwrap();
        parser.feed(b"\n").unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn comments_and_event_names_are_ignored() {
        let mut parser = SseParser::new();
        parser
            .feed(b": keep-alive\nevent: message\ndata: {\"result\":42}\n\n")
            .unwrap();
        assert_eq!(parser.finish().unwrap(), json!(42));
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let mut parser = SseParser::new();
        parser
            .feed(b"data: {\"result\":{\"ok\":true}}\r\n\r\n")
            .unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"ok": true}));
    }

    #[test]
    fn error_frame_fails_immediately() {
        let mut parser = SseParser::new();
        let err = parser
            .feed(b"data: {\"error\":{\"code\":-32000,\"message\":\"boom\"}}\n\n")
            .unwrap_err();
        assert!(matches!(err, TransportError::Rpc { code: -32000, .. }));
    }

    #[test]
    fn stream_without_result_is_incomplete() {
        let mut parser = SseParser::new();
        parser.feed(b": ping\n\ndata: [DONE]\n\n").unwrap();
        assert!(matches!(
            parser.finish(),
            Err(TransportError::IncompleteStream)
        ));
    }

    #[test]
    fn frame_without_result_key_yields_whole_object() {
        let mut parser = SseParser::new();
        parser.feed(b"data: {\"foo\":\"bar\"}\n\n").unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn multiline_data_joins_with_newline() {
        let mut parser = SseParser::new();
        parser
            .feed(b"data: {\"result\":\ndata: {\"x\":1}}\n\n")
            .unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn trailing_frame_without_blank_line_is_flushed() {
        let mut parser = SseParser::new();
        parser.feed(b"data: {\"result\":{\"x\":2}}\n").unwrap();
        assert_eq!(parser.finish().unwrap(), json!({"x": 2}));
    }

    #[test]
    fn undecodable_frames_fail_the_parse() {
        let mut parser = SseParser::new();
        let err = parser.feed(b"data: {\"result\": oops}\n\n").unwrap_err();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }

    #[test]
    fn truncated_trailing_frame_fails_at_finish() {
        let mut parser = SseParser::new();
        parser.feed(b"data: {\"id\":\n").unwrap();
        assert!(matches!(
            parser.finish(),
            Err(TransportError::InvalidResponse(_))
        ));
    }
}
