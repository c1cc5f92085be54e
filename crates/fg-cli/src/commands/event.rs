//! Event dispatch command

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::context::CliContext;
use crate::output::print_success;
use fg_client::{Action, DispatchReceipt, Dispatcher, LifecycleEvent};

/// What a name given on the command line resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Action(Action),
    Lifecycle(LifecycleEvent),
}

/// Resolve a name against the action table, then the lifecycle table
pub fn resolve_event(name: &str) -> Result<EventKind> {
    if let Ok(action) = name.parse::<Action>() {
        return Ok(EventKind::Action(action));
    }
    if let Ok(event) = name.parse::<LifecycleEvent>() {
        return Ok(EventKind::Lifecycle(event));
    }

    let known: Vec<&str> = Action::ALL
        .iter()
        .map(Action::as_str)
        .chain(LifecycleEvent::ALL.iter().map(LifecycleEvent::as_str))
        .collect();
    bail!("Unknown event '{}'. Known events: {}", name, known.join(", "))
}

/// Send one action or lifecycle event with an optional JSON payload
pub async fn event_command(ctx: &CliContext, name: &str, data: Option<&str>) -> Result<()> {
    let kind = resolve_event(name)?;
    let payload: Value = match data {
        Some(raw) => serde_json::from_str(raw).context("--data must be valid JSON")?,
        None => Value::Object(Default::default()),
    };

    let store = ctx.load_config()?;
    let dispatcher = Dispatcher::new(ctx.api_client(&store)?);

    let receipt: DispatchReceipt = match kind {
        EventKind::Action(action) => dispatcher.dispatch_action(action, &payload).await,
        EventKind::Lifecycle(event) => dispatcher.dispatch_event(event, &payload).await,
    }
    .with_context(|| format!("Failed to dispatch {}", name))?;

    print_success(&format!("Dispatched {} ({}: {})", name, receipt.id, receipt.status));
    Ok(())
}
