//! TLS configuration and certificate loading.
//!
//! The certificate chain and private key are loaded once at boot; any
//! problem here is fatal before either listener opens.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

/// Error type for TLS context construction.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("no certificates found in {0}")]
    EmptyCertChain(String),

    #[error("no private key found in {0}")]
    MissingKey(String),

    #[error("TLS configuration rejected: {0}")]
    Config(#[from] rustls::Error),
}

/// Build a server-side TLS acceptor from a PEM certificate chain and its
/// matching private key.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, TlsError> {
    let certs = load_certs(cert_path)?;
    let key = load_key(key_path)?;

    let config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: path.display().to_string(),
            source,
        })?;

    if certs.is_empty() {
        return Err(TlsError::EmptyCertChain(path.display().to_string()));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|source| TlsError::Read {
            path: path.display().to_string(),
            source,
        })?
        .ok_or_else(|| TlsError::MissingKey(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn cert_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cert")
    }

    #[test]
    fn loads_checked_in_test_keychain() {
        let acceptor = load_tls_acceptor(
            &cert_dir().join("test-cert.pem"),
            &cert_dir().join("test-key.pem"),
        );
        assert!(acceptor.is_ok());
    }

    #[test]
    fn missing_cert_file_is_fatal() {
        let err = load_tls_acceptor(
            &cert_dir().join("no-such-cert.pem"),
            &cert_dir().join("test-key.pem"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, TlsError::Read { .. }));
    }

    #[test]
    fn garbage_cert_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a certificate").unwrap();
        let err = load_tls_acceptor(file.path(), &cert_dir().join("test-key.pem"))
            .err()
            .unwrap();
        assert!(matches!(err, TlsError::EmptyCertChain(_)));
    }

    #[test]
    fn key_file_without_key_is_fatal() {
        // A cert file is valid PEM but holds no private key.
        let err = load_tls_acceptor(
            &cert_dir().join("test-cert.pem"),
            &cert_dir().join("test-cert.pem"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, TlsError::MissingKey(_)));
    }
}
