//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, keep-alive probe setup)
//!     → tls.rs (TLS handshake, encrypted listener only)
//!     → Hand off to the WebSocket layer
//! ```
//!
//! # Design Decisions
//! - TLS context is built once at boot; a bad certificate is fatal before
//!   either listener opens
//! - Keep-alive probing is configured per accepted socket, uniformly on
//!   both listeners

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
pub use tls::{load_tls_acceptor, TlsError};
