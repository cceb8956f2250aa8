//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use quote_relay::config::RelayConfig;
use quote_relay::http::HttpServer;
use quote_relay::lifecycle::{build_services, Services, Shutdown};
use quote_relay::storage::QuotationStore;

/// Provider-shaped body with the given bid text.
pub fn upstream_body(bid: &str) -> String {
    format!(
        r#"{{"USDBRL":{{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.4712","low":"5.4021","varBid":"0.0105","pctChange":"0.19","bid":"{bid}","ask":"5.4312","timestamp":"1717790392","create_date":"2024-06-07 16:59:52"}}}}"#
    )
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Mock upstream that always answers `body` immediately.
pub async fn start_mock_backend(body: String) -> SocketAddr {
    start_programmable_backend(move || {
        let body = body.clone();
        async move { (200, body) }
    })
    .await
}

/// Mock upstream that answers after `delay`.
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    start_programmable_backend(move || async move {
        tokio::time::sleep(delay).await;
        (200, upstream_body("5.43"))
    })
    .await
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Relay configuration pointed at `upstream`, storing under `dir`.
pub fn relay_config(upstream: SocketAddr, dir: &Path) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.upstream.url = format!("http://{}/json/last/USD-BRL", upstream);
    config.storage.database_url = format!("sqlite://{}", dir.join("quotation.db").display());
    // Generous store ceiling so slow CI disks don't turn into store timeouts.
    config.budget.overall_ms = 5_000;
    config.budget.fetch_ceiling_ms = 2_000;
    config.budget.store_ceiling_ms = 1_000;
    config
}

/// A running relay.
pub struct Relay {
    pub addr: SocketAddr,
    pub store: Option<QuotationStore>,
    pub shutdown: Shutdown,
}

impl Relay {
    pub fn url(&self) -> String {
        format!("http://{}/cotacao", self.addr)
    }

    pub async fn rows(&self) -> u64 {
        match &self.store {
            Some(store) => store.count().await.unwrap(),
            None => 0,
        }
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Build the services from `config` and serve them on an ephemeral port.
pub async fn start_relay(config: &RelayConfig) -> Relay {
    let Services { pipeline, store } = build_services(config).await.unwrap();

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(pipeline, shutdown.clone());

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    Relay {
        addr,
        store,
        shutdown,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
