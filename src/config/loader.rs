//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use crate::config::schema::FixtureConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single semantic validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("plain and TLS listeners are both bound to port {0}")]
    PortConflict(u16),

    #[error("supervisor.stop_poll_attempts must be at least 1")]
    NoPollAttempts,

    #[error("tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file.
///
/// The result is not yet validated: CLI overrides are applied on top of
/// file values first, then [`validate_config`] runs on the merged result.
pub fn load_config(path: &Path) -> Result<FixtureConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FixtureConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Semantic validation of a merged configuration.
///
/// Returns all failures, not just the first.
pub fn validate_config(config: &FixtureConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Port 0 means "ephemeral"; two ephemeral listeners never conflict.
    if config.listener.port != 0 && config.listener.port == config.listener.tls_port {
        errors.push(ValidationError::PortConflict(config.listener.port));
    }

    if config.supervisor.stop_poll_attempts == 0 {
        errors.push(ValidationError::NoPollAttempts);
    }

    if config.tls.cert_path.is_empty() {
        errors.push(ValidationError::EmptyTlsPath("cert_path"));
    }
    if config.tls.key_path.is_empty() {
        errors.push(ValidationError::EmptyTlsPath("key_path"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}
