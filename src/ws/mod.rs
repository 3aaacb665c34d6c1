//! WebSocket serving subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted TCP (or TLS) stream
//!     → handshake.rs (upgrade, capture negotiated path)
//!     → RouteTable::resolve(path)
//!     → handler.rs (run one scripted behavior, contain its failures)
//!
//! server.rs owns both listeners:
//!     plain accept loop ─┐
//!                        ├─ one task per connection → drain on shutdown
//!     tls accept loop   ─┘
//! ```
//!
//! # Design Decisions
//! - One task per connection; a connection's work never blocks another's
//! - Failures are contained at the task boundary, never in the accept loop
//! - Shutdown stops accepting first, then waits for in-flight handlers

pub mod handler;
pub mod handshake;
pub mod server;

pub use server::{serve, ServeError, WsServer};
