//! Daemon start/stop supervision.
//!
//! # Responsibilities
//! - Enforce the PID-file singleton: refuse to start over a live instance
//! - Self-heal stale or unreadable records
//! - Spawn the foreground server detached, output appended to the log file
//! - Stop gracefully, escalating to SIGKILL after the bounded poll window

use std::fs::OpenOptions;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::config::FixtureConfig;
use crate::daemon::pidfile::{is_running, PidFile};

/// Error type for supervisor operations.
///
/// `AlreadyRunning` and `NotRunning` are operator-surface conditions, not
/// faults: they map to exit code 1 and mutate no state.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("already running (pid {0})")]
    AlreadyRunning(i32),

    #[error("no PID file found at {0}")]
    NotRunning(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Spawn the server in the background and record its PID.
///
/// Returns the new process id on success.
pub fn start(config: &FixtureConfig) -> Result<u32, SupervisorError> {
    let pid_file = PidFile::new(&config.supervisor.pid_file);

    if pid_file.exists() {
        match pid_file.read() {
            Ok(pid) if is_running(pid) => return Err(SupervisorError::AlreadyRunning(pid)),
            Ok(pid) => {
                tracing::warn!(pid, "removing stale PID file");
                pid_file.remove()?;
            }
            Err(error) => {
                tracing::warn!(%error, "removing unreadable PID file");
                pid_file.remove()?;
            }
        }
    }

    let child = spawn_server(config)?;

    // Give the listeners time to bind before the record goes live.
    thread::sleep(Duration::from_millis(config.supervisor.settle_delay_ms));

    pid_file.write(child)?;
    Ok(child)
}

/// Spawn `ws-server serve` detached from this session, with stdout and
/// stderr appended to the configured log file.
fn spawn_server(config: &FixtureConfig) -> Result<u32, SupervisorError> {
    let exe = std::env::current_exe()?;

    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.supervisor.log_file)?;
    let log_err = log.try_clone()?;

    let mut command = Command::new(exe);
    command
        .arg("serve")
        .arg("--port")
        .arg(config.listener.port.to_string())
        .arg("--tls-port")
        .arg(config.listener.tls_port.to_string())
        .arg("--cert")
        .arg(&config.tls.cert_path)
        .arg("--key")
        .arg(&config.tls.key_path)
        .stdin(Stdio::null())
        .stdout(log)
        .stderr(log_err);

    // Detach into its own session so it survives this process and never
    // receives our terminal's signals.
    unsafe {
        command.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let child = command.spawn()?;
    Ok(child.id())
}

/// Stop the background server recorded in the PID file.
pub fn stop(config: &FixtureConfig) -> Result<(), SupervisorError> {
    let pid_file = PidFile::new(&config.supervisor.pid_file);

    if !pid_file.exists() {
        return Err(SupervisorError::NotRunning(
            pid_file.path().display().to_string(),
        ));
    }
    let pid = pid_file.read()?;

    if is_running(pid) {
        send_signal(pid, libc::SIGTERM)?;
    }

    let interval = Duration::from_millis(config.supervisor.stop_poll_interval_ms);
    let mut stopped = false;
    for _ in 0..config.supervisor.stop_poll_attempts {
        if !is_running(pid) {
            stopped = true;
            break;
        }
        thread::sleep(interval);
    }

    if !stopped {
        tracing::warn!(pid, "graceful termination timed out; sending SIGKILL");
        send_signal(pid, libc::SIGKILL)?;
    }

    pid_file.remove()?;
    Ok(())
}

/// Send a signal, treating "no such process" as success: the target being
/// gone is the outcome we wanted.
fn send_signal(pid: i32, signal: i32) -> io::Result<()> {
    let rc = unsafe { libc::kill(pid, signal) };
    if rc == 0 {
        return Ok(());
    }
    let error = io::Error::last_os_error();
    if error.raw_os_error() == Some(libc::ESRCH) {
        return Ok(());
    }
    Err(error)
}
