//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (idempotent)
//!
//! Shutdown (shutdown.rs):
//!     Running → ShuttingDown: stop accepting, broadcast to both listeners
//!     ShuttingDown → Stopped: both accept loops drained, all handlers done
//! ```
//!
//! # Design Decisions
//! - Trigger is an atomic one-shot; safe from signal context, second
//!   trigger is a no-op
//! - Ordered shutdown: stop accept, drain, close
//! - In-flight connections are never severed; they finish naturally

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownState};
