//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flag overrides (main.rs)
//!     → loader.rs validate (semantic checks)
//!     → FixtureConfig (validated, immutable)
//!     → shared by value with the supervisor and the serving path
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the fixture never reloads
//! - All fields have defaults so the binary runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_config, ConfigError, ValidationError};
pub use schema::FixtureConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::SupervisorConfig;
pub use schema::TlsConfig;
