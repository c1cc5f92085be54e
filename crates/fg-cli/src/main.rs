//! FraudGuard CLI
//!
//! Single binary for the SDK's operational tasks:
//! - Configuration inspection and overrides
//! - Store install/uninstall, event dispatch, merchant and order lookups
//! - Queue worker control, and the worker itself

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fraudguard::commands;
use fraudguard::context::CliContext;
use fraudguard::output::print_error;

#[derive(Parser)]
#[command(name = "fraudguard")]
#[command(author, version, about = "FraudGuard fraud-prevention SDK tools")]
#[command(propagate_version = true)]
struct Cli {
    /// Custom configuration override file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base configuration file (replaces the packaged defaults)
    #[arg(long, global = true)]
    base_config: Option<PathBuf>,

    /// Environment: production, testing or development
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Register this store and save the issued credentials
    Install {
        /// Public URL of the store
        #[arg(long)]
        store_url: String,
    },

    /// Deregister this store
    Uninstall,

    /// Dispatch an action or lifecycle event
    Event {
        /// Event name, e.g. order_created or installed
        name: String,
        /// JSON payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Show the merchant account
    Merchant,

    /// Show an order
    Order {
        id: String,
        /// Show only the fraud decision
        #[arg(short, long)]
        decision: bool,
    },

    /// Control the background queue worker
    Queue {
        #[command(subcommand)]
        action: QueueAction,
        /// PID-info file (defaults to the data directory)
        #[arg(long, global = true)]
        pid_file: Option<PathBuf>,
    },

    /// Run the queue worker in the foreground
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        pid_file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the merged configuration
    Show,
    /// Get a value by dot-path
    Get { key: String },
    /// Set a value in the override file
    Set { key: String, value: String },
    /// Show config directory path
    Path,
}

#[derive(Subcommand)]
enum QueueAction {
    /// Launch the worker unless it is already running
    Start,
    /// Kill the worker
    Stop,
    /// Show worker state
    Status,
    /// Kill and relaunch the worker
    Restart,
    /// Show pending queue items
    List {
        /// Maximum number of items to fetch
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    let ctx = CliContext {
        custom_file: cli.config,
        base_file: cli.base_config,
        environment: cli.env,
    };

    if !matches!(cli.command, Commands::Worker { .. }) {
        init_logging(log_level);
    }

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&ctx)?,
            ConfigAction::Get { key } => commands::config_get(&ctx, &key)?,
            ConfigAction::Set { key, value } => commands::config_set(&ctx, &key, &value)?,
            ConfigAction::Path => commands::config_path(),
        },

        Commands::Install { store_url } => {
            commands::install_command(&ctx, &store_url).await?;
        }

        Commands::Uninstall => {
            commands::uninstall_command(&ctx).await?;
        }

        Commands::Event { name, data } => {
            commands::event_command(&ctx, &name, data.as_deref()).await?;
        }

        Commands::Merchant => {
            commands::merchant_command(&ctx).await?;
        }

        Commands::Order { id, decision } => {
            commands::order_command(&ctx, &id, decision).await?;
        }

        Commands::Queue { action, pid_file } => {
            let pid_file = pid_file.as_deref();
            match action {
                QueueAction::Start => commands::queue_start(&ctx, pid_file)?,
                QueueAction::Stop => commands::queue_stop(&ctx, pid_file)?,
                QueueAction::Status => commands::queue_status(&ctx, pid_file)?,
                QueueAction::Restart => commands::queue_restart(&ctx, pid_file)?,
                QueueAction::List { limit } => commands::queue_list(&ctx, limit).await?,
            }
        }

        Commands::Worker { pid_file } => {
            // Detached with null stdio, so log to a file beside the PID-info record
            let log_file = pid_file.with_file_name("queue_worker.log");
            init_file_logging(if cli.verbose > 0 { log_level } else { "info" }, &log_file)?;
            commands::worker_command(&ctx, pid_file).await?;
        }
    }

    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()))
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(level: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open worker log {:?}", path))?;

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
