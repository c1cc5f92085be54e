//! Detached queue worker entry point
//!
//! Launched by the supervisor as `fraudguard worker --pid-file <path>`. The
//! PID-info record is written once at startup and removed on clean exit.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::context::CliContext;
use fg_client::QueueClient;
use fg_core::supervisor::PidInfoGuard;
use fg_core::ConfigStore;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_BATCH_SIZE: u64 = 25;

/// Polling parameters read from `queue.*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub poll_interval: Duration,
    pub batch_size: usize,
}

impl WorkerSettings {
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let read = |path: &str, default: u64| -> Result<u64> {
            if config.value_exists(path) {
                Ok(config.get_u64(path)?)
            } else {
                Ok(default)
            }
        };

        Ok(Self {
            // Zero would turn the poll loop into a busy loop
            poll_interval: Duration::from_secs(
                read("queue.poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS)?.max(1),
            ),
            batch_size: read("queue.batch_size", DEFAULT_BATCH_SIZE)?.max(1) as usize,
        })
    }
}

pub async fn worker_command(ctx: &CliContext, pid_file: PathBuf) -> Result<()> {
    let _guard = PidInfoGuard::create(pid_file.clone())
        .with_context(|| format!("Failed to write PID-info file {:?}", pid_file))?;
    tracing::info!(pid = std::process::id(), pid_file = ?pid_file, "Queue worker started");

    let store = ctx.load_config()?;
    let queue = QueueClient::new(ctx.api_client(&store)?);
    let settings = WorkerSettings::from_config(&store)?;
    tracing::info!(
        environment = %store.environment(),
        poll_interval = ?settings.poll_interval,
        batch_size = settings.batch_size,
        "Polling queue"
    );

    loop {
        let handled = drain_once(&queue, settings.batch_size).await;
        if handled > 0 {
            tracing::info!(handled, "Processed queue items");
        }

        tokio::select! {
            _ = tokio::time::sleep(settings.poll_interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Fetch one batch and acknowledge each item
///
/// Failures are logged; the next poll retries anything left unacknowledged.
async fn drain_once(queue: &QueueClient, batch_size: usize) -> usize {
    let items = match queue.fetch(batch_size).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Queue fetch failed: {}", e);
            return 0;
        }
    };

    let mut handled = 0;
    for item in items {
        tracing::debug!(id = %item.id, kind = %item.kind, "Handling queue item");
        match queue.acknowledge(&item.id).await {
            Ok(()) => handled += 1,
            Err(e) => tracing::warn!(id = %item.id, "Acknowledge failed: {}", e),
        }
    }
    handled
}
