//! Integration tests for the HTTP transports against a mock MCP server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mcplink_http::{HttpTransport, StreamableHttpTransport};
use mcplink_transport::{HttpServerConfig, Transport, TransportError, TransportKind};

fn config_for(server: &MockServer) -> HttpServerConfig {
    HttpServerConfig::new(format!("{}/mcp", server.uri()))
}

async fn mock_initialize(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "initialize"})))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn handshake_happens_once_and_captures_session_id() {
    let server = MockServer::start().await;

    mock_initialize(
        &server,
        ResponseTemplate::new(200)
            .insert_header("mcp-session-id", "sess-42")
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
    )
    .await;

    // Both calls must echo the captured session id.
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "tools/list"})))
        .and(header("mcp-session-id", "sess-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"jsonrpc": "2.0", "id": 2, "result": {"tools": []}}),
        ))
        .expect(2)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    assert_eq!(transport.kind(), TransportKind::Http);

    let first = transport.request("tools/list", None).await.unwrap();
    let second = transport.request("tools/list", None).await.unwrap();
    assert_eq!(first, json!({"tools": []}));
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_session_header_keeps_the_sentinel() {
    let server = MockServer::start().await;

    mock_initialize(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "ping"})))
        .and(header("mcp-session-id", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 2, "result": "pong"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    let result = transport.request("ping", None).await.unwrap();
    assert_eq!(result, json!("pong"));
}

#[tokio::test]
async fn custom_authorization_header_overrides_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(header("authorization", "Custom abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
        )
        .expect(2) // initialize + the call itself
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.token = Some("secret".to_string());
    config
        .headers
        .insert("Authorization".to_string(), "Custom abc".to_string());

    let transport = HttpTransport::new(config).unwrap();
    transport.request("tools/list", None).await.unwrap();
}

#[tokio::test]
async fn params_are_forwarded_and_rpc_errors_surface() {
    let server = MockServer::start().await;

    mock_initialize(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({
            "method": "tools/call",
            "params": {"name": "echo", "arguments": {"text": "hi"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": {"code": -32602, "message": "bad arguments"}
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    let err = transport
        .request(
            "tools/call",
            Some(json!({"name": "echo", "arguments": {"text": "hi"}})),
        )
        .await
        .unwrap_err();

    match err {
        TransportError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert_eq!(message, "bad arguments");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    let err = transport.request("tools/list", None).await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidResponse(_)));
}

#[tokio::test]
async fn http_failure_is_a_transport_error_naming_the_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    let err = transport.request("tools/list", None).await.unwrap_err();

    // The handshake runs first, so the failing action is `initialize`.
    match err {
        TransportError::Transport { action, .. } => assert_eq!(action, "initialize"),
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn streamable_transport_dispatches_on_content_type() {
    let server = MockServer::start().await;

    mock_initialize(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
    )
    .await;

    // JSON body: parsed like the unary transport.
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "resources/list"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"jsonrpc": "2.0", "id": 2, "result": {"resources": []}}),
        ))
        .mount(&server)
        .await;

    // SSE body: incremental frames, last result wins.
    let sse_body = concat!(
        "event: message\n",
        "data: {\"result\":{\"step\":1}}\n",
        "\n",
        "data: {\"result\":{\"step\":2,\"done\":true}}\n",
        "\n",
        "data: [DONE]\n",
        "\n",
    );
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(sse_body.as_bytes().to_vec(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let transport = StreamableHttpTransport::new(config_for(&server)).unwrap();
    assert_eq!(transport.kind(), TransportKind::StreamableHttp);

    let json_result = transport.request("resources/list", None).await.unwrap();
    assert_eq!(json_result, json!({"resources": []}));

    let sse_result = transport
        .request("tools/call", Some(json!({"name": "work", "arguments": {}})))
        .await
        .unwrap();
    assert_eq!(sse_result, json!({"step": 2, "done": true}));
}

#[tokio::test]
async fn streamable_transport_reports_result_less_streams() {
    let server = MockServer::start().await;

    mock_initialize(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(b": ping\n\ndata: [DONE]\n\n".to_vec(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let transport = StreamableHttpTransport::new(config_for(&server)).unwrap();
    let err = transport
        .request("tools/call", Some(json!({"name": "work", "arguments": {}})))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::IncompleteStream));
}

#[tokio::test]
async fn close_resets_the_session_and_rehandshakes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "initialize"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("mcp-session-id", "sess-a")
                .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({"method": "ping"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 2, "result": "pong"})),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(config_for(&server)).unwrap();
    transport.request("ping", None).await.unwrap();
    transport.close().await.unwrap();
    transport.close().await.unwrap(); // idempotent
    transport.request("ping", None).await.unwrap();
}
