//! Dual-listener WebSocket server.
//!
//! # Responsibilities
//! - Bind the plain and TLS listeners
//! - Run one accept loop per listener, spawning a task per connection
//! - On shutdown: stop accepting on both, then drain in-flight handlers
//!
//! # Design Decisions
//! - The TLS context is built before either listener binds (boot-fatal)
//! - A TLS handshake failure is a per-connection event, never fatal
//! - Drain never severs a connection; the stop path's escalation bounds it

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio_rustls::TlsAcceptor;

use crate::config::FixtureConfig;
use crate::lifecycle::{signals, Shutdown};
use crate::net::listener::{Listener, ListenerError};
use crate::net::tls::{load_tls_acceptor, TlsError};
use crate::routes::RouteTable;
use crate::ws::handler::handle_connection;

/// Error type for server startup. Everything here is boot-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to register signal handlers: {0}")]
    Signals(std::io::Error),

    #[error("invalid bind host {0:?}")]
    BindHost(String),
}

/// The fixture server: both listeners, bound and ready to run.
pub struct WsServer {
    routes: Arc<RouteTable>,
    plain: Listener,
    tls: Listener,
    tls_acceptor: TlsAcceptor,
    shutdown: Shutdown,
}

impl WsServer {
    /// Build the TLS context and bind both listeners.
    ///
    /// Certificate problems surface here, before any port is taken.
    pub async fn bind(
        config: &FixtureConfig,
        routes: RouteTable,
        shutdown: Shutdown,
    ) -> Result<Self, ServeError> {
        let tls_acceptor = load_tls_acceptor(
            config.tls.cert_path.as_ref(),
            config.tls.key_path.as_ref(),
        )?;

        let host: IpAddr = config
            .listener
            .host
            .parse()
            .map_err(|_| ServeError::BindHost(config.listener.host.clone()))?;
        let keepalive = Duration::from_secs(config.listener.keepalive_secs);

        let plain = Listener::bind(SocketAddr::new(host, config.listener.port), keepalive).await?;
        let tls =
            Listener::bind(SocketAddr::new(host, config.listener.tls_port), keepalive).await?;

        Ok(Self {
            routes: Arc::new(routes),
            plain,
            tls,
            tls_acceptor,
            shutdown,
        })
    }

    /// Local address of the plain listener.
    pub fn plain_addr(&self) -> SocketAddr {
        self.plain.local_addr()
    }

    /// Local address of the TLS listener.
    pub fn tls_addr(&self) -> SocketAddr {
        self.tls.local_addr()
    }

    /// Accept connections on both listeners until shutdown, then drain.
    pub async fn run(self) {
        let WsServer {
            routes,
            plain,
            tls,
            tls_acceptor,
            shutdown,
        } = self;

        let plain_loop = tokio::spawn(accept_loop(
            plain,
            None,
            Arc::clone(&routes),
            shutdown.clone(),
        ));
        let tls_loop = tokio::spawn(accept_loop(
            tls,
            Some(tls_acceptor),
            routes,
            shutdown.clone(),
        ));

        let _ = tokio::join!(plain_loop, tls_loop);

        shutdown.mark_stopped();
        tracing::info!("all listeners stopped");
    }
}

/// One listener's accept loop.
///
/// Spawns a task per connection and reaps finished ones as it goes; on
/// shutdown it closes the socket first and then waits for every in-flight
/// handler to exit.
async fn accept_loop(
    listener: Listener,
    tls_acceptor: Option<TlsAcceptor>,
    routes: Arc<RouteTable>,
    shutdown: Shutdown,
) {
    let address = listener.local_addr();
    let mut shutdown_rx = shutdown.subscribe();
    let mut handlers: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,

            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    spawn_handler(&mut handlers, stream, peer, tls_acceptor.clone(), Arc::clone(&routes));
                }
                Err(error) => {
                    tracing::warn!(address = %address, %error, "accept failed");
                }
            },

            Some(finished) = handlers.join_next(), if !handlers.is_empty() => {
                reap(finished);
            }
        }
    }

    // Stop accepting before waiting on in-flight connections.
    drop(listener);
    tracing::info!(
        address = %address,
        in_flight = handlers.len(),
        "listener draining"
    );

    while let Some(finished) = handlers.join_next().await {
        reap(finished);
    }

    tracing::info!(address = %address, "listener stopped");
}

fn spawn_handler(
    handlers: &mut JoinSet<()>,
    stream: TcpStream,
    peer: SocketAddr,
    tls_acceptor: Option<TlsAcceptor>,
    routes: Arc<RouteTable>,
) {
    match tls_acceptor {
        None => {
            handlers.spawn(handle_connection(stream, peer, routes));
        }
        Some(acceptor) => {
            handlers.spawn(async move {
                match acceptor.accept(stream).await {
                    Ok(tls_stream) => handle_connection(tls_stream, peer, routes).await,
                    Err(error) => {
                        tracing::warn!(peer = %peer, %error, "TLS handshake failed");
                    }
                }
            });
        }
    }
}

/// Supervisory boundary for handler tasks: a panicked connection is logged
/// and forgotten, never propagated.
fn reap(finished: Result<(), tokio::task::JoinError>) {
    if let Err(join_error) = finished {
        if join_error.is_panic() {
            tracing::error!(%join_error, "connection task panicked");
        }
    }
}

/// Run the fixture in the foreground until shutdown completes.
///
/// This is what the daemonized background process executes.
pub async fn serve(config: &FixtureConfig) -> Result<(), ServeError> {
    let shutdown = Shutdown::new();
    signals::install(&shutdown).map_err(ServeError::Signals)?;

    let server = WsServer::bind(config, RouteTable::new(), shutdown.clone()).await?;
    tracing::info!(
        plain = %server.plain_addr(),
        tls = %server.tls_addr(),
        routes = server.routes.len(),
        "serving"
    );

    server.run().await;
    Ok(())
}
