//! Process supervision subsystem.
//!
//! # Data Flow
//! ```text
//! start:
//!     PID file present? → probe liveness
//!         live  → "already running", nothing spawned
//!         stale → remove record, proceed
//!     spawn detached `serve` → settle delay → write PID file
//!
//! stop:
//!     PID file absent → "not running"
//!     SIGTERM → poll liveness (bounded) → SIGKILL if still alive
//!     → remove PID file
//! ```
//!
//! # Design Decisions
//! - At most one live record at a time; stale records self-heal on start
//! - The server logic never forks; detaching is entirely the supervisor's
//!   concern, so serving stays testable in-process

pub mod pidfile;
pub mod supervisor;

pub use pidfile::{is_running, PidFile};
pub use supervisor::{start, stop, SupervisorError};
