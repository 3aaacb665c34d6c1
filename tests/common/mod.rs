//! Shared utilities for integration testing.

use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};

use ws_fixture::config::FixtureConfig;
use ws_fixture::lifecycle::Shutdown;
use ws_fixture::routes::RouteTable;
use ws_fixture::ws::WsServer;

pub type ClientWs = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn cert_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cert")
}

/// Fixture config on ephemeral ports with the checked-in test keychain.
pub fn test_config() -> FixtureConfig {
    let mut config = FixtureConfig::default();
    config.listener.port = 0;
    config.listener.tls_port = 0;
    config.tls.cert_path = cert_dir().join("test-cert.pem").display().to_string();
    config.tls.key_path = cert_dir().join("test-key.pem").display().to_string();
    config
}

/// An in-process fixture server running on ephemeral ports.
pub struct TestServer {
    pub plain: SocketAddr,
    pub tls: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

pub async fn spawn_fixture() -> TestServer {
    let config = test_config();
    let shutdown = Shutdown::new();
    let server = WsServer::bind(&config, RouteTable::new(), shutdown.clone())
        .await
        .expect("fixture should bind on ephemeral ports");
    let plain = server.plain_addr();
    let tls = server.tls_addr();
    let handle = tokio::spawn(server.run());
    TestServer {
        plain,
        tls,
        shutdown,
        handle,
    }
}

pub async fn connect_plain(addr: SocketAddr, path: &str) -> ClientWs {
    let (ws, _) = connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("plain connect");
    ws
}

#[allow(dead_code)]
pub async fn connect_tls(addr: SocketAddr, path: &str) -> ClientWs {
    let connector = Connector::Rustls(Arc::new(client_tls_config()));
    // The test certificate carries an IP SAN for 127.0.0.1, so the socket
    // address works directly as the server name.
    let url = format!("wss://{addr}{path}");
    let (ws, _) = connect_async_tls_with_config(url, None, false, Some(connector))
        .await
        .expect("tls connect");
    ws
}

/// Client-side TLS config trusting only the checked-in test certificate.
fn client_tls_config() -> rustls::ClientConfig {
    let cert_path = cert_dir().join("test-cert.pem");
    let certs = rustls_pemfile::certs(&mut BufReader::new(File::open(cert_path).unwrap()))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mut roots = rustls::RootCertStore::empty();
    for cert in certs {
        roots.add(cert).unwrap();
    }

    rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_root_certificates(roots)
    .with_no_client_auth()
}

/// Read a session to its end, returning data frames and the close frame.
pub async fn collect_session(mut ws: ClientWs) -> (Vec<Message>, Option<CloseFrame>) {
    let mut messages = Vec::new();
    let mut close = None;
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Close(f)) => close = f,
            Ok(m) => messages.push(m),
            Err(_) => break,
        }
    }
    (messages, close)
}
