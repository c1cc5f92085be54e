//! Typed clients for the FraudGuard HTTP API
//!
//! All clients share one [`ApiClient`], built from a loaded
//! [`fg_core::ConfigStore`]:
//!
//! ```no_run
//! # async fn run() -> fg_client::Result<()> {
//! use fg_client::{ApiClient, OrderClient};
//! use fg_core::{ConfigStore, InitOptions};
//!
//! let config = ConfigStore::load(InitOptions::default().environment("testing"))?;
//! let orders = OrderClient::new(ApiClient::from_config(&config)?);
//! let decision = orders.decision("1001").await?;
//! println!("{}", decision.decision);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod error;
pub mod http;
pub mod install;
pub mod merchant;
pub mod orders;
pub mod queue;
pub mod templates;

pub use actions::{Action, DispatchReceipt, Dispatcher, LifecycleEvent};
pub use error::{ApiError, Result};
pub use http::{ApiClient, ClientOptions};
pub use install::{InstallClient, InstallRequest, InstallResponse};
pub use merchant::{Merchant, MerchantClient};
pub use orders::{Decision, Order, OrderClient};
pub use queue::{QueueClient, QueueItem};
pub use templates::{sdk_script_tag, Template, TemplateClient};
