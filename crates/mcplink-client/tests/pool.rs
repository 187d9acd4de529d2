//! Transport pool behavior.

use std::sync::Arc;

use mcplink_client::TransportPool;
use mcplink_transport::{HttpServerConfig, ServerConfig, StdioServerConfig};

fn stdio_config(command: &str) -> ServerConfig {
    ServerConfig::Stdio(StdioServerConfig::new(vec![command.to_string()]))
}

#[tokio::test]
async fn get_returns_the_identical_cached_instance() {
    let pool = TransportPool::new();
    let config = stdio_config("cat");

    let first = pool.get("s", &config).await.unwrap();
    let second = pool.get("s", &config).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn forget_evicts_and_a_later_get_rebuilds() {
    let pool = TransportPool::new();
    let config = stdio_config("cat");

    let first = pool.get("s", &config).await.unwrap();
    pool.forget("s").await.unwrap();
    let rebuilt = pool.get("s", &config).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
}

#[tokio::test]
async fn forget_of_an_unknown_name_is_a_noop() {
    let pool = TransportPool::new();
    pool.forget("missing").await.unwrap();
    assert!(pool.active_servers().await.is_empty());
}

#[tokio::test]
async fn stale_config_for_a_pooled_name_is_silently_ignored() {
    let pool = TransportPool::new();

    let first = pool.get("s", &stdio_config("cat")).await.unwrap();
    // Different transport kind entirely, same name: cached one wins.
    let http = ServerConfig::Http(HttpServerConfig::new("http://localhost/mcp"));
    let second = pool.get("s", &http).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn clear_closes_everything() {
    let pool = TransportPool::new();
    pool.get("a", &stdio_config("cat")).await.unwrap();
    pool.get("b", &stdio_config("cat")).await.unwrap();

    let mut servers = pool.active_servers().await;
    servers.sort();
    assert_eq!(servers, ["a", "b"]);

    pool.clear().await.unwrap();
    assert!(pool.active_servers().await.is_empty());
}
