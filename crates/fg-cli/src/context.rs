//! Shared command context: config layers, API client and supervisor wiring

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use fg_client::ApiClient;
use fg_core::config::{self, ConfigStore, InitOptions};
use fg_core::supervisor::{default_pid_info_path, ProcessSupervisor, WorkerCommand};

/// Global options every command sees
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    /// Custom override file given with `--config`
    pub custom_file: Option<PathBuf>,
    /// Base document given with `--base-config`
    pub base_file: Option<PathBuf>,
    /// Environment given with `--env`
    pub environment: Option<String>,
}

impl CliContext {
    /// Override file that `config set` and `install` write to
    pub fn override_path(&self) -> PathBuf {
        self.custom_file
            .clone()
            .unwrap_or_else(config::default_custom_config_path)
    }

    fn init_options(&self) -> InitOptions {
        let mut options = InitOptions::default();
        if let Some(env) = &self.environment {
            options = options.environment(env.clone());
        }
        if let Some(base) = &self.base_file {
            options = options.base_file(base.clone());
        }

        // The default override file is optional; an explicit one must exist
        let custom = self.override_path();
        if self.custom_file.is_some() || custom.exists() {
            options = options.custom_file(custom);
        }
        options
    }

    /// Load and validate the layered configuration
    pub fn load_config(&self) -> Result<ConfigStore> {
        ConfigStore::load(self.init_options()).context("Failed to load configuration")
    }

    /// API client for the configured environment
    pub fn api_client(&self, config: &ConfigStore) -> Result<ApiClient> {
        ApiClient::from_config(config).context("Failed to create API client")
    }

    /// Supervisor for the queue worker, launching this binary in worker mode
    pub fn supervisor(
        &self,
        config: &ConfigStore,
        pid_file: Option<&Path>,
    ) -> Result<ProcessSupervisor> {
        let pid_file = pid_file
            .map(Path::to_path_buf)
            .unwrap_or_else(default_pid_info_path);
        let exe = std::env::current_exe().context("Failed to locate the fraudguard executable")?;

        let mut worker = WorkerCommand::new(exe)
            .arg("worker")
            .arg("--pid-file")
            .arg(pid_file.as_os_str())
            .arg("--env")
            .arg(config.environment().as_str());
        if let Some(custom) = &self.custom_file {
            worker = worker.arg("--config").arg(custom.as_os_str());
        }
        if let Some(base) = &self.base_file {
            worker = worker.arg("--base-config").arg(base.as_os_str());
        }

        let mut supervisor = ProcessSupervisor::new(pid_file, worker);
        if config.value_exists("queue.max_run_time") {
            let max_run_time = config.get_str("queue.max_run_time")?;
            supervisor
                .set_max_run_time(max_run_time)
                .with_context(|| format!("Invalid queue.max_run_time '{}'", max_run_time))?;
        }
        Ok(supervisor)
    }
}
