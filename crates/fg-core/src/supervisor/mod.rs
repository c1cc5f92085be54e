//! Queue-worker process supervision
//!
//! Keeps at most one detached worker process alive. The worker announces
//! itself in a PID-info file; the supervisor treats the file's existence as
//! proof the worker runs (no OS-level PID check), and kills and replaces a
//! worker whose recorded start time is older than the max run time.
//!
//! ```text
//! Stopped --start--> Running --(max run time elapses)--> Stale
//!    ^                  |                                  |
//!    +------kill--------+------------kill / start----------+
//! ```

pub mod pidinfo;
mod platform;

pub use pidinfo::{default_pid_info_path, PidInfo, PidInfoGuard};
pub use platform::{Platform, WorkerCommand};

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;

use crate::error::SupervisorError;
use crate::time::{current_time_secs, cutoff_secs};

/// Max run time applied when none is configured
pub const DEFAULT_MAX_RUN_TIME: &str = "1 hour";

/// How long a worker may run before it counts as stale
///
/// Written as a relative duration such as `"1 hours"`, `"30 min"` or
/// `"0 seconds"`. A leading sign is ignored, so `"-1 hour"` means the same
/// as `"1 hour"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxRunTime {
    raw: String,
    duration: Duration,
}

impl MaxRunTime {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl FromStr for MaxRunTime {
    type Err = SupervisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unsigned = trimmed
            .strip_prefix(|c: char| c == '-' || c == '+')
            .unwrap_or(trimmed)
            .trim_start();
        let duration =
            humantime::parse_duration(unsigned).map_err(|e| SupervisorError::InvalidDuration {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            raw: trimmed.to_string(),
            duration,
        })
    }
}

impl Default for MaxRunTime {
    fn default() -> Self {
        Self {
            raw: DEFAULT_MAX_RUN_TIME.to_string(),
            duration: Duration::from_secs(3600),
        }
    }
}

impl fmt::Display for MaxRunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Worker state as seen through the PID-info file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// No PID-info file
    Stopped,
    /// PID-info file present and within the max run time
    Running,
    /// PID-info file present but older than the max run time
    Stale,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Stopped => write!(f, "stopped"),
            ServiceStatus::Running => write!(f, "running"),
            ServiceStatus::Stale => write!(f, "stale"),
        }
    }
}

/// Starts, inspects and kills the background queue worker
///
/// Liveness is assumed from the PID-info file alone. Checking and launching
/// are not atomic, so two supervisors racing on a stopped worker may both
/// launch one.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    pid_file: PathBuf,
    worker: WorkerCommand,
    platform: Platform,
    max_run_time: MaxRunTime,
}

impl ProcessSupervisor {
    /// Create a supervisor for the current platform
    pub fn new(pid_file: impl Into<PathBuf>, worker: WorkerCommand) -> Self {
        Self {
            pid_file: pid_file.into(),
            worker,
            platform: Platform::current(),
            max_run_time: MaxRunTime::default(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_max_run_time(mut self, max_run_time: MaxRunTime) -> Self {
        self.max_run_time = max_run_time;
        self
    }

    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }

    pub fn worker(&self) -> &WorkerCommand {
        &self.worker
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn max_run_time(&self) -> &MaxRunTime {
        &self.max_run_time
    }

    /// Change the max run time, e.g. `"1 hours"` or `"0 seconds"`
    pub fn set_max_run_time(&mut self, value: &str) -> Result<(), SupervisorError> {
        self.max_run_time = value.parse()?;
        Ok(())
    }

    /// Launch the worker unless a fresh one is already running
    ///
    /// A stale worker is killed first. Returns `true` once the launch command
    /// has been issued; it does not wait for the worker's PID-info file.
    pub fn start_service(&self) -> bool {
        if self.is_service_running() {
            if !self.check_process_runtime() {
                tracing::debug!(pid = ?self.process_id(), "Worker already running");
                return false;
            }
            tracing::info!("Replacing stale worker");
        }

        let mut cmd = self.platform.launch_command(&self.worker);
        match run_quietly(&mut cmd) {
            Ok(()) => {
                tracing::info!(program = ?self.worker.program, "Worker launched");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to launch worker: {}", e);
                false
            }
        }
    }

    /// Force-kill the worker and remove its PID-info file
    ///
    /// Returns `false` if there was no PID-info file.
    pub fn kill_service(&self) -> bool {
        if !self.is_service_running() {
            return false;
        }

        match pidinfo::read_pid_info(&self.pid_file) {
            Ok(Some(info)) => {
                let mut cmd = self.platform.kill_command(info.process_id);
                match run_quietly(&mut cmd) {
                    Ok(()) => tracing::info!(pid = info.process_id, "Worker killed"),
                    Err(e) => tracing::warn!(pid = info.process_id, "Kill command failed: {}", e),
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Unreadable PID-info file {:?}: {}", self.pid_file, e),
        }

        if let Err(e) = pidinfo::remove_pid_info(&self.pid_file) {
            tracing::warn!("Failed to remove PID-info file {:?}: {}", self.pid_file, e);
        }
        true
    }

    /// Whether the PID-info file exists
    pub fn is_service_running(&self) -> bool {
        self.pid_file.exists()
    }

    /// PID recorded by the running worker
    pub fn process_id(&self) -> Option<u32> {
        if !self.is_service_running() {
            return None;
        }
        match pidinfo::read_pid_info(&self.pid_file) {
            Ok(info) => info.map(|info| info.process_id),
            Err(e) => {
                tracing::warn!("Unreadable PID-info file {:?}: {}", self.pid_file, e);
                None
            }
        }
    }

    /// Kill the worker if it has outlived the max run time
    ///
    /// Returns the result of [`ProcessSupervisor::kill_service`] for a stale
    /// worker and `false` otherwise.
    pub fn check_process_runtime(&self) -> bool {
        if self.is_stale() {
            tracing::info!(max_run_time = %self.max_run_time, "Worker exceeded max run time");
            self.kill_service()
        } else {
            false
        }
    }

    /// Current state without side effects
    pub fn status(&self) -> ServiceStatus {
        if !self.is_service_running() {
            ServiceStatus::Stopped
        } else if self.is_stale() {
            ServiceStatus::Stale
        } else {
            ServiceStatus::Running
        }
    }

    /// Recorded start time of the running worker
    pub fn last_update_time(&self) -> Option<u64> {
        pidinfo::read_pid_info(&self.pid_file)
            .ok()
            .flatten()
            .and_then(|info| info.last_update_time)
    }

    fn is_stale(&self) -> bool {
        let now = current_time_secs();
        let last_update = self.last_update_time().unwrap_or(now);
        last_update <= cutoff_secs(now, self.max_run_time.duration())
    }
}

/// Run a command to completion with all stdio detached
fn run_quietly(cmd: &mut Command) -> std::io::Result<()> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{:?} exited with {}", cmd.get_program(), status),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn supervisor(dir: &TempDir) -> ProcessSupervisor {
        ProcessSupervisor::new(
            dir.path().join("worker.json"),
            WorkerCommand::new("/nonexistent/fraudguard").arg("worker"),
        )
    }

    fn record(sup: &ProcessSupervisor, pid: u32, last_update_time: Option<u64>) {
        pidinfo::write_pid_info(
            sup.pid_file(),
            &PidInfo {
                process_id: pid,
                last_update_time,
            },
        )
        .unwrap();
    }

    // Far above any real pid_max, so `kill -9` always fails harmlessly
    const UNUSED_PID: u32 = 999_999_999;

    #[test]
    fn test_max_run_time_parsing() {
        let hour: MaxRunTime = "1 hours".parse().unwrap();
        assert_eq!(hour.duration(), Duration::from_secs(3600));
        assert_eq!(hour.as_str(), "1 hours");

        let zero: MaxRunTime = "0 seconds".parse().unwrap();
        assert_eq!(zero.duration(), Duration::ZERO);

        let signed: MaxRunTime = "-30 minutes".parse().unwrap();
        assert_eq!(signed.duration(), Duration::from_secs(1800));

        assert!("soon".parse::<MaxRunTime>().is_err());
        assert_eq!(MaxRunTime::default().duration(), Duration::from_secs(3600));
    }

    #[test]
    fn test_set_max_run_time() {
        let dir = TempDir::new().unwrap();
        let mut sup = supervisor(&dir);
        assert_eq!(sup.max_run_time().as_str(), DEFAULT_MAX_RUN_TIME);

        sup.set_max_run_time("0 seconds").unwrap();
        assert_eq!(sup.max_run_time().duration(), Duration::ZERO);

        let err = sup.set_max_run_time("whenever").unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidDuration { .. }));
        assert_eq!(sup.max_run_time().as_str(), "0 seconds");
    }

    #[test]
    fn test_not_running_without_pid_file() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        assert!(!sup.is_service_running());
        assert_eq!(sup.process_id(), None);
        assert_eq!(sup.status(), ServiceStatus::Stopped);
    }

    #[test]
    fn test_kill_without_pid_file() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        assert!(!sup.kill_service());
        assert!(!sup.kill_service());
    }

    #[test]
    fn test_pid_file_means_running() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        // Liveness is assumed from the file, not checked against the OS
        assert!(sup.is_service_running());
        assert_eq!(sup.process_id(), Some(UNUSED_PID));
        assert_eq!(sup.status(), ServiceStatus::Running);
    }

    #[test]
    fn test_kill_removes_pid_file() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        assert!(sup.kill_service());
        assert!(!sup.is_service_running());
        assert!(!sup.kill_service());
    }

    #[test]
    fn test_kill_removes_malformed_pid_file() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        std::fs::write(sup.pid_file(), "not json").unwrap();

        assert!(sup.is_service_running());
        assert_eq!(sup.process_id(), None);
        assert!(sup.kill_service());
        assert!(!sup.is_service_running());
    }

    #[test]
    fn test_fresh_worker_is_not_stale() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        assert!(!sup.check_process_runtime());
        assert!(sup.is_service_running());
    }

    #[test]
    fn test_old_worker_is_killed() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, Some(current_time_secs() - 7200));

        assert_eq!(sup.status(), ServiceStatus::Stale);
        assert!(sup.check_process_runtime());
        assert!(!sup.is_service_running());
    }

    #[test]
    fn test_missing_timestamp_is_never_stale() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, None);

        assert!(!sup.check_process_runtime());
        assert!(sup.is_service_running());
    }

    #[test]
    fn test_zero_max_run_time_is_always_stale() {
        let dir = TempDir::new().unwrap();
        let mut sup = supervisor(&dir);
        sup.set_max_run_time("0 seconds").unwrap();
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        assert!(sup.check_process_runtime());
        assert!(!sup.is_service_running());
    }

    #[test]
    fn test_start_is_noop_while_fresh_worker_runs() {
        let dir = TempDir::new().unwrap();
        let sup = supervisor(&dir);
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        assert!(!sup.start_service());
        assert_eq!(sup.process_id(), Some(UNUSED_PID));
    }

    #[cfg(unix)]
    #[test]
    fn test_start_replaces_stale_worker() {
        let dir = TempDir::new().unwrap();
        let mut sup = supervisor(&dir);
        sup.set_max_run_time("0 seconds").unwrap();
        record(&sup, UNUSED_PID, Some(current_time_secs()));

        // The launch itself goes through `sh`, which succeeds even though the
        // worker program does not exist
        assert!(sup.start_service());
        assert!(!sup.is_service_running());
    }
}
