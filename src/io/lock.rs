use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";
const RETRY_EVERY: Duration = Duration::from_millis(10);
const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Exclusive advisory lock on a data directory, held for the whole of one
/// `folio` command.
///
/// The lock file stays in place after release; waiters may already hold it
/// open. Closing the handle releases the `flock`.
#[derive(Debug)]
pub struct FileLock {
    _handle: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    CreateError { path: PathBuf, source: io::Error },
    #[error("timed out waiting for {path}: another folio command is writing")]
    Timeout { path: PathBuf },
}

impl FileLock {
    /// Block until the data directory is ours, or give up after `wait`.
    pub fn acquire(data_dir: &Path, wait: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let handle = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::CreateError {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + wait;
        while !try_exclusive(&handle) {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            thread::sleep(RETRY_EVERY);
        }
        Ok(FileLock { _handle: handle })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, DEFAULT_WAIT)
    }
}

#[cfg(unix)]
fn try_exclusive(handle: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(handle.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_exclusive(_handle: &File) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_release_reacquire() {
        let tmp = TempDir::new().unwrap();
        let lock = FileLock::acquire_default(tmp.path()).unwrap();
        drop(lock);
        assert!(FileLock::acquire(tmp.path(), Duration::from_millis(50)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_holder_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        let second = FileLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_handoff_to_waiter_keeps_single_holder() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let first = FileLock::acquire_default(&dir).unwrap();

        let waiter = {
            let dir = dir.clone();
            thread::spawn(move || FileLock::acquire(&dir, Duration::from_secs(5)))
        };
        // let the waiter open the lock file and start polling
        thread::sleep(Duration::from_millis(100));
        drop(first);
        let second = waiter.join().unwrap().unwrap();

        let third = FileLock::acquire(&dir, Duration::from_millis(50));
        assert!(matches!(third, Err(LockError::Timeout { .. })));

        drop(second);
        assert!(FileLock::acquire(&dir, Duration::from_millis(500)).is_ok());
    }
}
