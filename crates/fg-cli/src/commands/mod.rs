//! CLI command implementations

mod config;
mod event;
mod install;
mod lookup;
mod queue;
mod worker;

pub use config::{config_get, config_path, config_set, config_show};
pub use event::{event_command, resolve_event, EventKind};
pub use install::{install_command, uninstall_command};
pub use lookup::{merchant_command, order_command};
pub use queue::{
    queue_list, queue_restart, queue_start, queue_status, queue_stop, worker_report,
};
pub use worker::{worker_command, WorkerSettings};
