//! Scripted WebSocket test server.
//!
//! A protocol-test fixture exposing deterministic connection behaviors over
//! real WebSocket framing, on a plain and a TLS listener at once, so client
//! implementations can be exercised against known response sequences.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  ws-server                    │
//!                    │                                               │
//!   start/stop ──────┼─▶ daemon (PID file, spawn, liveness, kill)    │
//!                    │        │ spawns `serve`                       │
//!                    │        ▼                                      │
//!   ws:// client ────┼─▶ net listener ─┐                             │
//!                    │                 ├─▶ ws handshake ─▶ routes ──▶│ scripted
//!   wss:// client ───┼─▶ net tls ──────┘        │                    │ behavior
//!                    │                          ▼                    │
//!   SIGTERM/SIGINT ──┼─▶ lifecycle (trigger → drain → stopped)       │
//!                    │                                               │
//!                    │   cross-cutting: config, tracing              │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! # Routes
//!
//! - `/binary`    : sends 4 bytes BINARY, then closes.
//! - `/counter`   : sends `counter={i}` for i in 0..9, then closes.
//! - `/heartbeat` : sends love forever.
//! - `/hello`     : sends TEXT "Hello, World!", then closes.
//! - anything else: closes with 1008 "unknown path".

// Core subsystems
pub mod config;
pub mod net;
pub mod routes;
pub mod ws;

// Process concerns
pub mod daemon;
pub mod lifecycle;

pub use config::FixtureConfig;
pub use lifecycle::Shutdown;
pub use routes::RouteTable;
pub use ws::WsServer;
