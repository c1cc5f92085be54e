//! fg-core: Configuration and worker supervision for the FraudGuard SDK
//!
//! This crate provides the layered [`config::ConfigStore`] that every API
//! client reads its URLs and credentials from, and the
//! [`supervisor::ProcessSupervisor`] that keeps the background queue worker
//! alive.

pub mod config;
pub mod error;
pub mod supervisor;
pub mod time;

pub use config::{ConfigStore, Environment, InitOptions};
pub use error::{ConfigError, SupervisorError};
pub use supervisor::{ProcessSupervisor, ServiceStatus, WorkerCommand};
