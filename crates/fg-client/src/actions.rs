//! Store actions and lifecycle events reported to the API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use fg_core::time::current_time_secs;

use crate::error::{ApiError, Result};
use crate::http::ApiClient;

/// Store activity the platform scores for fraud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OrderCreated,
    OrderUpdated,
    OrderCanceled,
    OrderRefunded,
    OrderFulfilled,
    PaymentAuthorized,
    PaymentFailed,
    CustomerRegistered,
    CustomerLogin,
    CustomerUpdated,
    CheckoutStarted,
    CartUpdated,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::OrderCreated,
        Action::OrderUpdated,
        Action::OrderCanceled,
        Action::OrderRefunded,
        Action::OrderFulfilled,
        Action::PaymentAuthorized,
        Action::PaymentFailed,
        Action::CustomerRegistered,
        Action::CustomerLogin,
        Action::CustomerUpdated,
        Action::CheckoutStarted,
        Action::CartUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::OrderCreated => "order_created",
            Action::OrderUpdated => "order_updated",
            Action::OrderCanceled => "order_canceled",
            Action::OrderRefunded => "order_refunded",
            Action::OrderFulfilled => "order_fulfilled",
            Action::PaymentAuthorized => "payment_authorized",
            Action::PaymentFailed => "payment_failed",
            Action::CustomerRegistered => "customer_registered",
            Action::CustomerLogin => "customer_login",
            Action::CustomerUpdated => "customer_updated",
            Action::CheckoutStarted => "checkout_started",
            Action::CartUpdated => "cart_updated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ApiError::InvalidArgument(format!("unknown action '{}'", s)))
    }
}

/// Changes to the integration itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Installed,
    Uninstalled,
    Enabled,
    Disabled,
    ConfigUpdated,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 5] = [
        LifecycleEvent::Installed,
        LifecycleEvent::Uninstalled,
        LifecycleEvent::Enabled,
        LifecycleEvent::Disabled,
        LifecycleEvent::ConfigUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Installed => "installed",
            LifecycleEvent::Uninstalled => "uninstalled",
            LifecycleEvent::Enabled => "enabled",
            LifecycleEvent::Disabled => "disabled",
            LifecycleEvent::ConfigUpdated => "config_updated",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        LifecycleEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ApiError::InvalidArgument(format!("unknown lifecycle event '{}'", s)))
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    store_id: u64,
    occurred_at: u64,
    payload: &'a Value,
}

/// API acknowledgement of a dispatched action or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub id: String,
    pub status: String,
}

/// Sends actions and lifecycle events
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: ApiClient,
}

impl Dispatcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dispatch_action(
        &self,
        action: Action,
        payload: &Value,
    ) -> Result<DispatchReceipt> {
        tracing::debug!(%action, "Dispatching action");
        self.send("actions", action.as_str(), payload).await
    }

    pub async fn dispatch_event(
        &self,
        event: LifecycleEvent,
        payload: &Value,
    ) -> Result<DispatchReceipt> {
        tracing::debug!(%event, "Dispatching lifecycle event");
        self.send("events", event.as_str(), payload).await
    }

    async fn send(
        &self,
        path: &str,
        kind: &'static str,
        payload: &Value,
    ) -> Result<DispatchReceipt> {
        let envelope = Envelope {
            kind,
            store_id: self.client.store_id(),
            occurred_at: current_time_secs(),
            payload,
        };
        self.client.post(path, &envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        for event in LifecycleEvent::ALL {
            assert_eq!(event.as_str().parse::<LifecycleEvent>().unwrap(), event);
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!("order_deleted".parse::<Action>().is_err());
        assert!("Installed".parse::<LifecycleEvent>().is_err());
        assert!("installed".parse::<Action>().is_err());
    }

    #[test]
    fn test_envelope_shape() {
        let payload = serde_json::json!({ "order_id": "1001" });
        let envelope = Envelope {
            kind: Action::OrderCreated.as_str(),
            store_id: 3,
            occurred_at: 1_700_000_000,
            payload: &payload,
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            serde_json::json!({
                "type": "order_created",
                "store_id": 3,
                "occurred_at": 1_700_000_000u64,
                "payload": { "order_id": "1001" },
            })
        );
    }
}
