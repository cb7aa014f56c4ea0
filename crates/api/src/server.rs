//! Listener setup for the relay server.

use tokio::net::TcpListener;

/// Bind `host:port`. `host` may be an IPv4/IPv6 literal or a resolvable name.
pub async fn bind_listener(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}:{}: {}", host, port, e))
}
