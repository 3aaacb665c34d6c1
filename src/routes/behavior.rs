//! Scripted connection behaviors.
//!
//! Each behavior is a fixed sequence of sends and closes executed once per
//! connection. The timing constants are part of the script: clients under
//! test assert on them.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

/// Payload of the single frame sent on `/binary`.
pub const BINARY_PAYLOAD: [u8; 4] = [0x00, 0x01, 0x02, 0x03];

/// Payload of the single frame sent on `/hello`.
pub const HELLO_TEXT: &str = "Hello, World!";

/// Payload sent periodically on `/heartbeat`.
pub const HEARTBEAT_TEXT: &str = "\u{1fac0}";

/// Number of messages sent on `/counter`.
pub const COUNTER_MESSAGES: u32 = 10;

/// Spacing between `/counter` messages.
pub const COUNTER_INTERVAL: Duration = Duration::from_millis(100);

/// Spacing between `/heartbeat` messages.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(5);

/// Close reason sent for paths outside the route table.
pub const REJECT_REASON: &str = "unknown path";

/// A scripted behavior bound to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Send one fixed binary frame, then close normally.
    Binary,
    /// Send `counter={i}` for i in 0..10, spaced by [`COUNTER_INTERVAL`],
    /// then close normally.
    Counter,
    /// Send [`HEARTBEAT_TEXT`] every [`HEARTBEAT_PERIOD`], forever. Ends
    /// only when the peer goes away or the process exits.
    Heartbeat,
    /// Send one fixed text frame, then close normally.
    Hello,
    /// Close immediately with a policy-violation status; no frame is ever
    /// sent first.
    Reject,
}

impl Behavior {
    /// Execute this behavior to completion against one connection.
    pub async fn run<S>(self, ws: &mut WebSocketStream<S>) -> Result<(), WsError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            Behavior::Binary => {
                ws.send(Message::binary(BINARY_PAYLOAD.to_vec())).await?;
                close_with(ws, CloseCode::Normal, "").await
            }
            Behavior::Counter => {
                for i in 0..COUNTER_MESSAGES {
                    ws.send(Message::text(format!("counter={i}"))).await?;
                    tokio::time::sleep(COUNTER_INTERVAL).await;
                }
                close_with(ws, CloseCode::Normal, "").await
            }
            Behavior::Heartbeat => loop {
                ws.send(Message::text(HEARTBEAT_TEXT)).await?;
                tokio::time::sleep(HEARTBEAT_PERIOD).await;
            },
            Behavior::Hello => {
                ws.send(Message::text(HELLO_TEXT)).await?;
                close_with(ws, CloseCode::Normal, "").await
            }
            Behavior::Reject => close_with(ws, CloseCode::Policy, REJECT_REASON).await,
        }
    }
}

/// Send a close frame and drive the stream until the closing handshake
/// completes.
async fn close_with<S>(
    ws: &mut WebSocketStream<S>,
    code: CloseCode,
    reason: &str,
) -> Result<(), WsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    ws.close(Some(CloseFrame {
        code,
        reason: reason.into(),
    }))
    .await?;

    // Discard anything the peer sends until its close reply arrives.
    while ws.next().await.transpose()?.is_some() {}
    Ok(())
}
