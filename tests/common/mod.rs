//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use authgate::config::ProxyConfig;
use authgate::http::HttpServer;
use authgate::lifecycle::Shutdown;

/// Start a mock upstream on an ephemeral port, returning a fixed 200
/// response. Returns the address it listens on.
#[allow(dead_code)]
pub async fn start_mock_upstream(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_request_head(&mut socket).await;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Handle to a recording upstream: how many requests arrived and what
/// their head (request line + headers) looked like on the wire.
#[derive(Clone, Default)]
pub struct RecordingUpstream {
    hits: Arc<AtomicU32>,
    heads: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingUpstream {
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request heads, one per request, in arrival order.
    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }

    /// Just the request line (e.g. `GET /api?key=abc HTTP/1.1`) of each
    /// captured request.
    pub fn request_lines(&self) -> Vec<String> {
        self.heads()
            .iter()
            .filter_map(|head| head.lines().next().map(str::to_owned))
            .collect()
    }
}

/// Start a mock upstream on an ephemeral port that records every
/// request it receives before answering 200.
#[allow(dead_code)]
pub async fn start_recording_upstream(body: &'static str) -> (SocketAddr, RecordingUpstream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let upstream = RecordingUpstream::default();
    let handle = upstream.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        if let Some(head) = read_request_head(&mut socket).await {
                            handle.heads.lock().unwrap().push(head);
                            handle.hits.fetch_add(1, Ordering::SeqCst);
                        }
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, upstream)
}

/// Read from the socket until the end of the request head.
async fn read_request_head(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => return None,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    return Some(String::from_utf8_lossy(&buf[..end]).into_owned());
                }
            }
            Err(_) => return None,
        }
    }
}

/// Start the proxy under test on an ephemeral port.
///
/// Returns the address it serves on and the shutdown coordinator; tests
/// trigger the latter when done.
#[allow(dead_code)]
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(&config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    // Give the acceptor a moment to come up.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// A reqwest client that neither pools nor consults proxy env vars.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
