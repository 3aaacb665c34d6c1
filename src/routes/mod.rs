//! Route dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Negotiated request path
//!     → table.rs (exact-match lookup)
//!     → behavior.rs (scripted send/close sequence)
//!
//! Table construction (at startup):
//!     fixed path set → freeze as immutable RouteTable → share via Arc
//! ```
//!
//! # Design Decisions
//! - Routes fixed at boot, immutable at runtime (thread-safe without locks)
//! - Exact string match only: no wildcards, no path parameters
//! - Unmatched paths dispatch to an explicit reject behavior, never a panic

pub mod behavior;
pub mod table;

pub use behavior::Behavior;
pub use table::RouteTable;
