//! Shutdown coordination for the fixture.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Lifecycle state of the serving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    /// Both listeners accepting.
    Running,
    /// Trigger observed; listeners are closing and draining.
    ShuttingDown,
    /// Both listeners drained. Terminal.
    Stopped,
}

const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const STOPPED: u8 = 2;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that both accept loops subscribe to, behind
/// an atomic state machine: Running → ShuttingDown → Stopped, no transition
/// skips a state. Cloning is cheap and every clone observes the same state.
#[derive(Debug, Clone)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: AtomicU8,
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator in the Running state.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(Inner {
                state: AtomicU8::new(RUNNING),
                tx,
            }),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.inner.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    ///
    /// Idempotent and safe to invoke from a signal-handling task: only the
    /// first call moves Running → ShuttingDown and fans out the broadcast;
    /// later calls are no-ops.
    pub fn trigger(&self) {
        if self
            .inner
            .state
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _ = self.inner.tx.send(());
        }
    }

    /// Record that both listeners have drained. Only legal from
    /// ShuttingDown; any other call leaves the state untouched.
    pub fn mark_stopped(&self) {
        let _ = self.inner.state.compare_exchange(
            SHUTTING_DOWN,
            STOPPED,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ShutdownState {
        match self.inner.state.load(Ordering::Acquire) {
            RUNNING => ShutdownState::Running,
            SHUTTING_DOWN => ShutdownState::ShuttingDown,
            _ => ShutdownState::Stopped,
        }
    }

    /// True once trigger has been observed.
    pub fn is_shutting_down(&self) -> bool {
        self.state() != ShutdownState::Running
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.state(), ShutdownState::Running);
        assert!(!shutdown.is_shutting_down());
    }

    #[tokio::test]
    async fn trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut rx_a = shutdown.subscribe();
        let mut rx_b = shutdown.subscribe();

        shutdown.trigger();
        assert!(rx_a.recv().await.is_ok());
        assert!(rx_b.recv().await.is_ok());
        assert_eq!(shutdown.state(), ShutdownState::ShuttingDown);
    }

    #[tokio::test]
    async fn second_trigger_is_a_no_op() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        shutdown.trigger();
        shutdown.trigger();

        assert!(rx.recv().await.is_ok());
        // Exactly one broadcast was sent.
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(shutdown.state(), ShutdownState::ShuttingDown);
    }

    #[test]
    fn stop_cannot_skip_shutting_down() {
        let shutdown = Shutdown::new();
        shutdown.mark_stopped();
        assert_eq!(shutdown.state(), ShutdownState::Running);

        shutdown.trigger();
        shutdown.mark_stopped();
        assert_eq!(shutdown.state(), ShutdownState::Stopped);
    }

    #[test]
    fn stopped_is_terminal() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.mark_stopped();
        shutdown.trigger();
        assert_eq!(shutdown.state(), ShutdownState::Stopped);
    }

    #[test]
    fn clones_share_state() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();
        shutdown.trigger();
        assert_eq!(observer.state(), ShutdownState::ShuttingDown);
    }
}
