//! End-to-end test of the shipped binary: start, connect, stop.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

fn cert_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cert")
}

/// Each test gets its own port pair: tests in this binary run in parallel.
fn write_config(dir: &Path, plain_port: u16, tls_port: u16) -> PathBuf {
    let pid_file = dir.join("ws-server.pid");
    let log_file = dir.join("ws-server.log");
    let config_path = dir.join("fixture.toml");
    fs::write(
        &config_path,
        format!(
            r#"[listener]
port = {plain_port}
tls_port = {tls_port}

[tls]
cert_path = "{cert}"
key_path = "{key}"

[supervisor]
pid_file = "{pid}"
log_file = "{log}"
"#,
            cert = cert_dir().join("test-cert.pem").display(),
            key = cert_dir().join("test-key.pem").display(),
            pid = pid_file.display(),
            log = log_file.display(),
        ),
    )
    .unwrap();
    config_path
}

fn run(config: &Path, mode: &str) -> std::process::ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_ws-server"))
        .args(["--config", config.to_str().unwrap(), mode])
        .status()
        .unwrap()
}

#[test]
fn start_hello_stop_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let plain_port = 29000;
    let config = write_config(dir.path(), plain_port, 29443);
    let pid_file = dir.path().join("ws-server.pid");
    let log_file = dir.path().join("ws-server.log");

    // start with no record: succeeds and the server is live within the
    // settle delay.
    assert!(run(&config, "start").success());
    assert!(pid_file.exists());

    // start over a live record: exit 1, nothing spawned, record untouched.
    let recorded = fs::read_to_string(&pid_file).unwrap();
    let second = run(&config, "start");
    assert_eq!(second.code(), Some(1));
    assert_eq!(fs::read_to_string(&pid_file).unwrap(), recorded);

    // /hello over the plain port: one text frame, then a normal close.
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let (mut ws, _) =
            tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{plain_port}/hello"))
                .await
                .expect("daemon must be accepting after start returns");

        let frame = ws.next().await.unwrap().unwrap();
        assert_eq!(frame.into_text().unwrap().as_str(), "Hello, World!");

        match ws.next().await.unwrap().unwrap() {
            Message::Close(Some(close)) => assert_eq!(close.code, CloseCode::Normal),
            other => panic!("expected close frame, got {other:?}"),
        }
    });

    // stop: exit 0, process gone, record removed.
    assert!(run(&config, "stop").success());
    assert!(!pid_file.exists());

    // stop with no record: exit 1.
    assert_eq!(run(&config, "stop").code(), Some(1));

    // The daemon logged into the configured sink.
    assert!(log_file.exists());
    assert!(!fs::read_to_string(&log_file).unwrap().is_empty());
}

#[test]
fn start_heals_a_stale_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 29100, 29543);
    let pid_file = dir.path().join("ws-server.pid");

    // Plant a record pointing at a process that is certainly dead.
    let mut child = Command::new("true").spawn().unwrap();
    let dead_pid = child.id();
    child.wait().unwrap();
    fs::write(&pid_file, dead_pid.to_string()).unwrap();

    assert!(run(&config, "start").success());

    let healed = fs::read_to_string(&pid_file).unwrap();
    assert_ne!(healed, dead_pid.to_string());

    assert!(run(&config, "stop").success());
    assert!(!pid_file.exists());
}
