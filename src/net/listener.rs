//! TCP listener implementation.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Apply the configured TCP keep-alive probe to every accepted socket
//! - Graceful handling of accept errors

use std::net::SocketAddr;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::{TcpListener, TcpStream};

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),

    /// Failed to accept connection.
    #[error("failed to accept: {0}")]
    Accept(std::io::Error),
}

/// A bound TCP listener.
///
/// Every accepted socket gets the same keep-alive probe interval; the probe
/// is a liveness check, not a data-path concern.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
    keepalive: Duration,
}

impl Listener {
    /// Bind to an address, with the keep-alive interval to apply on accept.
    pub async fn bind(addr: SocketAddr, keepalive: Duration) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;

        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            keepalive_secs = keepalive.as_secs(),
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            local_addr,
            keepalive,
        })
    }

    /// Accept a new connection with the keep-alive probe configured.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        let probe = TcpKeepalive::new()
            .with_time(self.keepalive)
            .with_interval(self.keepalive);
        SockRef::from(&stream)
            .set_tcp_keepalive(&probe)
            .map_err(ListenerError::Accept)?;

        tracing::debug!(peer_addr = %addr, "Connection accepted");

        Ok((stream, addr))
    }

    /// The local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
