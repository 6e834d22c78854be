//! Lock file management for single-instance enforcement.
//!
//! Only one auroranotify-ui may own the session bus name and the renderer
//! socket, so a second instance is refused up front with a pointer at the
//! running PID. Stale locks left by a crashed instance are detected by
//! probing the recorded PID and cleaned up automatically.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::constants::LOCK_FILE_NAME;

/// Acquire an exclusive lock in the runtime directory.
///
/// Returns the held lock file and its path; dropping the file releases the
/// kernel lock, and [`release_lock`] removes the file itself on clean
/// shutdown.
pub fn acquire_lock() -> Result<(File, PathBuf)> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    acquire_lock_at(&PathBuf::from(runtime_dir).join(LOCK_FILE_NAME))
}

/// Acquire an exclusive lock at an explicit path.
pub fn acquire_lock_at(lock_path: &Path) -> Result<(File, PathBuf)> {
    // Open without truncating so an existing holder's PID survives until we
    // know the lock is ours
    let mut lock_file = open_lock_file(lock_path)?;

    if lock_file.try_lock_exclusive().is_err() {
        handle_lock_conflict(lock_path)?;

        // Conflict was resolved (stale lock removed), retry once
        lock_file = open_lock_file(lock_path)?;
        lock_file
            .try_lock_exclusive()
            .context("failed to acquire lock after stale-lock cleanup")?;
    }

    // Lock acquired, now safe to replace the content with our PID
    lock_file.set_len(0)?;
    lock_file.seek(SeekFrom::Start(0))?;
    writeln!(&lock_file, "{}", std::process::id())?;
    lock_file.flush()?;

    Ok((lock_file, lock_path.to_path_buf()))
}

/// Release the lock and remove the lock file.
pub fn release_lock(lock_file: File, lock_path: &Path) {
    let _ = fs2::FileExt::unlock(&lock_file);
    drop(lock_file);
    let _ = std::fs::remove_file(lock_path);
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("failed to open lock file: {}", lock_path.display()))
}

/// Validate an existing lock: remove it when stale, refuse to start when the
/// recorded process is still alive.
fn handle_lock_conflict(lock_path: &Path) -> Result<()> {
    let lock_content = match std::fs::read_to_string(lock_path) {
        Ok(content) => content,
        // Lock file vanished or is unreadable; assume it was cleaned up
        Err(_) => return Ok(()),
    };

    let pid = match lock_content.trim().lines().next().and_then(|line| line.parse::<u32>().ok()) {
        Some(pid) => pid,
        None => {
            log_warning!("Lock file contains invalid PID, removing stale lock");
            let _ = std::fs::remove_file(lock_path);
            return Ok(());
        }
    };

    if !is_process_running(pid) {
        log_warning!("Removing stale lock file (process {pid} no longer running)");
        let _ = std::fs::remove_file(lock_path);
        return Ok(());
    }

    log_pipe!();
    log_error!("auroranotify-ui is already running (PID: {pid})");
    log_indented!("Reload its configuration with: kill -USR2 {pid}");
    anyhow::bail!("cannot start, another auroranotify-ui instance is running")
}

/// Check whether a process with the given PID exists.
fn is_process_running(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // Signal 0 probes for existence without delivering anything
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_records_our_pid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lock");

        let (file, lock_path) = acquire_lock_at(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());

        release_lock(file, &lock_path);
        assert!(!path.exists());
    }

    #[test]
    fn stale_lock_with_garbage_pid_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lock");
        std::fs::write(&path, "not-a-pid\n").unwrap();

        let (file, lock_path) = acquire_lock_at(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());
        release_lock(file, &lock_path);
    }

    #[test]
    fn current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
