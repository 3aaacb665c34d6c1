//! PID file handling and process liveness probing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The persisted record of the running foreground server: one decimal
/// process id.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and parse the recorded process id.
    pub fn read(&self) -> io::Result<i32> {
        let content = fs::read_to_string(&self.path)?;
        content.trim().parse::<i32>().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} does not hold a PID", self.path.display()),
            )
        })
    }

    pub fn write(&self, pid: u32) -> io::Result<()> {
        fs::write(&self.path, pid.to_string())
    }

    pub fn remove(&self) -> io::Result<()> {
        fs::remove_file(&self.path)
    }
}

/// Non-destructive liveness probe: signal 0 checks existence only.
///
/// EPERM means the process exists but belongs to someone else, so it
/// counts as running.
pub fn is_running(pid: i32) -> bool {
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 {
        return true;
    }
    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}
