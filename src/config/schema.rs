//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fixture.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the WebSocket test fixture.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Listener configuration (bind host, ports, keep-alive).
    pub listener: ListenerConfig,

    /// TLS certificate configuration for the encrypted listener.
    pub tls: TlsConfig,

    /// Background-process supervision settings.
    pub supervisor: SupervisorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host both listeners bind to.
    pub host: String,

    /// Port for the plain WebSocket listener. 0 binds an ephemeral port.
    pub port: u16,

    /// Port for the TLS WebSocket listener. 0 binds an ephemeral port.
    pub tls_port: u16,

    /// TCP keep-alive probe interval in seconds, applied to every
    /// accepted connection on both listeners.
    pub keepalive_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            tls_port: 9443,
            keepalive_secs: 1,
        }
    }
}

/// TLS configuration for the encrypted listener.
///
/// Both files must exist and parse at boot; anything else is fatal
/// before either listener opens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to the certificate chain file (PEM).
    pub cert_path: String,

    /// Path to the private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "tests/cert/test-cert.pem".to_string(),
            key_path: "tests/cert/test-key.pem".to_string(),
        }
    }
}

/// Background-process supervision settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Path of the PID file recording the foreground server process.
    pub pid_file: String,

    /// Path of the log file receiving the foreground process output,
    /// opened in append mode across restarts.
    pub log_file: String,

    /// Delay after spawning before the PID file is written, giving the
    /// listeners time to bind.
    pub settle_delay_ms: u64,

    /// Interval between liveness polls while waiting for a stopped
    /// process to exit.
    pub stop_poll_interval_ms: u64,

    /// Number of liveness polls before escalating to SIGKILL.
    pub stop_poll_attempts: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            pid_file: "ws-server.pid".to_string(),
            log_file: "ws-server.log".to_string(),
            settle_delay_ms: 1000,
            stop_poll_interval_ms: 100,
            stop_poll_attempts: 20,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
        }
    }
}
