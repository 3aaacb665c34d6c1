//! WebSocket upgrade handling.
//!
//! The underlying protocol library drives the HTTP upgrade; the only thing
//! this fixture needs from the request is the negotiated path, captured
//! during the header callback before the stream switches to frames.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

/// Accept a WebSocket upgrade and return the stream together with the
/// request path the client negotiated.
pub async fn accept<S>(stream: S) -> Result<(WebSocketStream<S>, String), WsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut path = String::new();
    let ws = accept_hdr_async(stream, |req: &Request, resp: Response| {
        path = req.uri().path().to_string();
        Ok(resp)
    })
    .await?;
    Ok((ws, path))
}
