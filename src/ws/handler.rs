//! Per-connection handling.
//!
//! # Responsibilities
//! - Run exactly one scripted behavior per accepted connection
//! - Contain behavior failures: one bad connection never affects others
//! - Emit a "connection stopped" record on every exit path
//!
//! # Design Decisions
//! - Peer-initiated normal closure mid-write is expected, not an error
//! - The exit record is a drop guard, so it survives early returns and
//!   panics alike

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::routes::RouteTable;
use crate::ws::handshake;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient since we only need uniqueness.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Guard that marks a connection's end of life.
///
/// Logs the stop record when dropped, on every exit path.
struct ConnectionGuard {
    id: ConnectionId,
    peer: SocketAddr,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        tracing::info!(connection = %self.id, peer = %self.peer, "connection stopped");
    }
}

/// Handle one accepted connection to completion.
///
/// Never returns an error: every failure is dealt with here so the accept
/// loops stay failure-free.
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, routes: Arc<RouteTable>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let id = ConnectionId::new();
    let _guard = ConnectionGuard { id, peer };

    let (mut ws, path) = match handshake::accept(stream).await {
        Ok(accepted) => accepted,
        Err(error) => {
            tracing::warn!(connection = %id, peer = %peer, %error, "handshake failed");
            return;
        }
    };

    tracing::info!(connection = %id, peer = %peer, path = %path, "peer connected");

    let behavior = routes.resolve(&path);
    match behavior.run(&mut ws).await {
        Ok(()) => {}
        Err(error) if is_peer_disconnect(&error) => {
            // Client hung up mid-script; that is its prerogative.
        }
        Err(error) => {
            tracing::error!(
                connection = %id,
                peer = %peer,
                path = %path,
                %error,
                "handler failed"
            );
        }
    }
}

/// Whether an error means the peer went away, as opposed to a real fault.
fn is_peer_disconnect(error: &WsError) -> bool {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => true,
        WsError::Protocol(
            ProtocolError::SendAfterClosing | ProtocolError::ResetWithoutClosingHandshake,
        ) => true,
        WsError::Io(io) => matches!(
            io.kind(),
            std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}
