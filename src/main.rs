//! `ws-server`: test server for the WebSocket protocol.
//!
//! Three mutually exclusive modes: `start` spawns a background daemon,
//! `serve` runs in the foreground (what the daemon executes), `stop` ends
//! the background daemon. Exit code 1 reports "already running" and
//! "not running"; any other fatal condition also exits nonzero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ws_fixture::config::{self, FixtureConfig};
use ws_fixture::daemon;
use ws_fixture::ws;

#[derive(Parser)]
#[command(name = "ws-server")]
#[command(about = "Test server for the WebSocket protocol", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn the server in the background and exit.
    Start(ServeArgs),
    /// Run the server in the foreground (internal).
    Serve(ServeArgs),
    /// Stop the background server.
    Stop,
}

/// Flags shared by `start` and `serve`; unset flags fall back to the
/// config file, then to the built-in defaults.
#[derive(Args)]
struct ServeArgs {
    /// Port for the plain listener [default: 9000]
    #[arg(long)]
    port: Option<u16>,

    /// Port for the TLS listener [default: 9443]
    #[arg(long)]
    tls_port: Option<u16>,

    /// Path to the PEM certificate chain [default: tests/cert/test-cert.pem]
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Path to the PEM private key [default: tests/cert/test-key.pem]
    #[arg(long)]
    key: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(&self, config: &mut FixtureConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(tls_port) = self.tls_port {
            config.listener.tls_port = tls_port;
        }
        if let Some(cert) = &self.cert {
            config.tls.cert_path = cert.display().to_string();
        }
        if let Some(key) = &self.key {
            config.tls.key_path = key.display().to_string();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match config::load_config(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("[ws-server] {error}");
                return ExitCode::FAILURE;
            }
        },
        None => FixtureConfig::default(),
    };

    if let Commands::Start(args) | Commands::Serve(args) = &cli.command {
        args.apply(&mut config);
    }

    if let Err(error) = config::validate_config(&config) {
        eprintln!("[ws-server] {error}");
        return ExitCode::FAILURE;
    }

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.observability.log_level)
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Start(_) => match daemon::start(&config) {
            Ok(pid) => {
                eprintln!("[ws-server] started pid={pid}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("[ws-server] {error}");
                ExitCode::FAILURE
            }
        },
        Commands::Serve(_) => serve(&config),
        Commands::Stop => match daemon::stop(&config) {
            Ok(()) => {
                eprintln!("[ws-server] stopped");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("[ws-server] {error}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Run the foreground server to completion on a fresh runtime.
fn serve(config: &FixtureConfig) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("[ws-server] failed to start runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        port = config.listener.port,
        tls_port = config.listener.tls_port,
        "ws-server starting"
    );

    match runtime.block_on(ws::serve(config)) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "server failed to start");
            ExitCode::FAILURE
        }
    }
}
