//! fraudguard: command-line interface for the FraudGuard SDK
//!
//! Inspects and edits the layered configuration, talks to the API, and
//! controls the detached queue worker.

pub mod commands;
pub mod context;
pub mod output;
