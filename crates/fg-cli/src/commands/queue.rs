//! Queue worker control commands

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::context::CliContext;
use crate::output::{
    format_queue_items, format_worker_report, print_info, print_success, print_warning,
    WorkerReport,
};
use fg_client::QueueClient;
use fg_core::{ProcessSupervisor, ServiceStatus};

/// Snapshot the worker state without changing it
pub fn worker_report(supervisor: &ProcessSupervisor) -> WorkerReport {
    WorkerReport {
        status: supervisor.status(),
        process_id: supervisor.process_id(),
        last_update_time: supervisor.last_update_time(),
        max_run_time: supervisor.max_run_time().to_string(),
        pid_file: supervisor.pid_file().display().to_string(),
    }
}

/// Launch the worker unless a fresh one is already running
pub fn queue_start(ctx: &CliContext, pid_file: Option<&Path>) -> Result<()> {
    let store = ctx.load_config()?;
    let supervisor = ctx.supervisor(&store, pid_file)?;
    let before = supervisor.status();

    if supervisor.start_service() {
        if before == ServiceStatus::Stale {
            print_info("Replaced stale queue worker");
        }
        print_success("Queue worker launched");
        return Ok(());
    }

    match supervisor.status() {
        ServiceStatus::Running => {
            let pid = supervisor
                .process_id()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            print_warning(&format!("Queue worker already running (pid {})", pid));
            Ok(())
        }
        _ => bail!("Failed to launch queue worker"),
    }
}

pub fn queue_stop(ctx: &CliContext, pid_file: Option<&Path>) -> Result<()> {
    let store = ctx.load_config()?;
    let supervisor = ctx.supervisor(&store, pid_file)?;

    if supervisor.kill_service() {
        print_success("Queue worker stopped");
    } else {
        print_warning("Queue worker is not running");
    }
    Ok(())
}

pub fn queue_status(ctx: &CliContext, pid_file: Option<&Path>) -> Result<()> {
    let store = ctx.load_config()?;
    let supervisor = ctx.supervisor(&store, pid_file)?;
    println!("{}", format_worker_report(&worker_report(&supervisor)));
    Ok(())
}

/// Kill any running worker and launch a new one
pub fn queue_restart(ctx: &CliContext, pid_file: Option<&Path>) -> Result<()> {
    let store = ctx.load_config()?;
    let supervisor = ctx.supervisor(&store, pid_file)?;

    if supervisor.kill_service() {
        print_info("Stopped queue worker");
    }
    if !supervisor.start_service() {
        bail!("Failed to launch queue worker");
    }
    print_success("Queue worker launched");
    Ok(())
}

/// Show pending queue items without acknowledging them
pub async fn queue_list(ctx: &CliContext, limit: usize) -> Result<()> {
    let store = ctx.load_config()?;
    let items = QueueClient::new(ctx.api_client(&store)?)
        .fetch(limit.max(1))
        .await
        .context("Failed to fetch queue items")?;

    println!("{}", format_queue_items(&items));
    Ok(())
}
