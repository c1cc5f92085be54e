//! Merchant and order lookups

use anyhow::{Context, Result};

use crate::context::CliContext;
use crate::output::format_decision;
use fg_client::{MerchantClient, OrderClient};

pub async fn merchant_command(ctx: &CliContext) -> Result<()> {
    let store = ctx.load_config()?;
    let merchant = MerchantClient::new(ctx.api_client(&store)?)
        .get()
        .await
        .context("Failed to fetch merchant")?;

    println!("{}", serde_json::to_string_pretty(&merchant)?);
    Ok(())
}

/// Show an order, or only its fraud decision
pub async fn order_command(ctx: &CliContext, id: &str, decision: bool) -> Result<()> {
    let store = ctx.load_config()?;
    let orders = OrderClient::new(ctx.api_client(&store)?);

    if decision {
        let decision = orders
            .decision(id)
            .await
            .with_context(|| format!("Failed to fetch decision for order {}", id))?;
        println!("{}", format_decision(&decision));
    } else {
        let order = orders
            .get(id)
            .await
            .with_context(|| format!("Failed to fetch order {}", id))?;
        println!("{}", serde_json::to_string_pretty(&order)?);
    }
    Ok(())
}
