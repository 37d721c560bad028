/// Advisory file locking for shared state files
///
/// Uses a dedicated `.lock` inode alongside the data file. The data file is
/// never opened for locking, so it can be replaced by rename while the lock is
/// held. The lock file is never removed to avoid inode-reuse races.
use crate::config::types::{GraderError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Held exclusive lock; released when dropped (flock is released on close)
#[derive(Debug)]
pub struct FileLockGuard {
    _file: File,
    path: PathBuf,
}

impl FileLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lock file path for `data_path`, e.g. `leaderboard.json` → `leaderboard.json.lock`
pub fn lock_path_for(data_path: &Path) -> PathBuf {
    data_path.with_extension(
        data_path
            .extension()
            .map(|e| format!("{}.lock", e.to_string_lossy()))
            .unwrap_or_else(|| "lock".to_string()),
    )
}

/// Block until an exclusive lock for `data_path` is held.
pub fn lock_exclusive(data_path: &Path) -> Result<FileLockGuard> {
    let lock_path = lock_path_for(data_path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)?;

    flock_exclusive(&file).map_err(|e| {
        GraderError::Lock(format!("failed to lock {}: {}", lock_path.display(), e))
    })?;
    log::debug!("acquired {}", lock_path.display());

    Ok(FileLockGuard {
        _file: file,
        path: lock_path,
    })
}

/// Run `operation` while holding the lock for `data_path`.
pub fn with_file_lock<T, F>(data_path: &Path, operation: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _guard = lock_exclusive(data_path)?;
    operation()
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    loop {
        // SAFETY: fd is owned by `file` and stays open for the duration of the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if rc == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "flock not supported on this platform",
    ))
}
