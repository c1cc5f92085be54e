//! PID-info file utilities
//!
//! The queue worker records itself in a small JSON file:
//!
//! ```json
//! {"process_id": 4242, "last_update_time": 1767225600}
//! ```
//!
//! The file's existence is the only liveness signal the supervisor uses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::time::current_time_secs;

/// Default PID-info file name
const PID_INFO_FILE_NAME: &str = "queue_worker.json";

/// Get the default PID-info file path
pub fn default_pid_info_path() -> PathBuf {
    config::default_data_dir().join(PID_INFO_FILE_NAME)
}

/// Contents of the PID-info file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidInfo {
    pub process_id: u32,
    /// Unix seconds; older workers may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<u64>,
}

impl PidInfo {
    /// Record for the calling process, stamped now
    pub fn current() -> Self {
        Self {
            process_id: std::process::id(),
            last_update_time: Some(current_time_secs()),
        }
    }
}

/// Read the PID-info file
///
/// Returns `Ok(Some(info))` if the file exists and parses, `Ok(None)` if
/// the file doesn't exist, or an error if the file is malformed.
pub fn read_pid_info(path: &Path) -> io::Result<Option<PidInfo>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let info = serde_json::from_str(&contents)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            Ok(Some(info))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write the PID-info file
///
/// Creates parent directories if they don't exist.
pub fn write_pid_info(path: &Path, info: &PidInfo) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string(info)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, contents)
}

/// Remove the PID-info file
///
/// Returns `Ok(())` even if the file doesn't exist.
pub fn remove_pid_info(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Guard that removes the PID-info file when dropped
///
/// Covers a worker that exits on its own; a forced kill skips `Drop` and
/// leaves cleanup to the supervisor.
pub struct PidInfoGuard {
    path: PathBuf,
}

impl PidInfoGuard {
    /// Write the record for the calling process and guard it
    pub fn create(path: PathBuf) -> io::Result<Self> {
        write_pid_info(&path, &PidInfo::current())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidInfoGuard {
    fn drop(&mut self) {
        // Only remove our own record; a replacement worker may own it by now
        match read_pid_info(&self.path) {
            Ok(Some(info)) if info.process_id != std::process::id() => return,
            _ => {}
        }
        if let Err(e) = remove_pid_info(&self.path) {
            tracing::warn!("Failed to remove PID-info file {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_nonexistent_pid_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worker.json");
        assert!(read_pid_info(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_and_read_pid_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("worker.json");
        let info = PidInfo {
            process_id: 12345,
            last_update_time: Some(1_700_000_000),
        };

        write_pid_info(&path, &info).unwrap();
        assert_eq!(read_pid_info(&path).unwrap(), Some(info));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"process_id": 12345, "last_update_time": 1_700_000_000})
        );
    }

    #[test]
    fn test_missing_timestamp_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worker.json");
        std::fs::write(&path, r#"{"process_id": 77}"#).unwrap();

        let info = read_pid_info(&path).unwrap().unwrap();
        assert_eq!(info.process_id, 77);
        assert_eq!(info.last_update_time, None);
    }

    #[test]
    fn test_malformed_pid_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worker.json");
        std::fs::write(&path, "12345\n").unwrap();

        let err = read_pid_info(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_remove_nonexistent_pid_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.json");
        // Should not error
        remove_pid_info(&path).unwrap();
    }

    #[test]
    fn test_current_pid_info() {
        let info = PidInfo::current();
        assert_eq!(info.process_id, std::process::id());
        assert!(info.last_update_time.unwrap() > 0);
    }

    #[test]
    fn test_pid_info_guard() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.json");

        {
            let guard = PidInfoGuard::create(path.clone()).unwrap();
            assert_eq!(guard.path(), path.as_path());
            assert!(path.exists());
        }

        // Guard dropped, file should be removed
        assert!(!path.exists());
    }

    #[test]
    fn test_pid_info_guard_leaves_foreign_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.json");

        {
            let _guard = PidInfoGuard::create(path.clone()).unwrap();
            let replacement = PidInfo {
                process_id: std::process::id().wrapping_add(1),
                last_update_time: None,
            };
            write_pid_info(&path, &replacement).unwrap();
        }

        assert!(path.exists());
    }
}
