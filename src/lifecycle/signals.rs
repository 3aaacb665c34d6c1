//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals into the shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Both signals are equivalent; repeats are absorbed by the idempotent
//!   trigger

use tokio::signal::unix::{signal, SignalKind};

use crate::lifecycle::shutdown::Shutdown;

/// Install SIGTERM/SIGINT handlers that trigger the given coordinator.
///
/// Must be called from within a Tokio runtime. Registration failures are
/// returned so the caller can treat them as boot-fatal.
pub fn install(shutdown: &Shutdown) -> std::io::Result<()> {
    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;

    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                r = term.recv() => r,
                r = int.recv() => r,
            };
            if received.is_none() {
                break;
            }
            tracing::warn!("shutting down (SIGTERM/SIGINT received)");
            shutdown.trigger();
        }
    });

    Ok(())
}
