//! Hand the order off to the messaging channel.

use anyhow::{Context as _, Result};
use turbo_cart::prelude::*;

use super::{confirm, CheckoutArgs};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let config = ctx.checkout_config()?;
    let store = ctx.open_store()?;

    let snapshot = store.snapshot();
    if !args.yes && !ctx.output.is_json() {
        ctx.output.cart(&snapshot, config.currency);
    }
    if !snapshot.is_empty()
        && !confirm(
            &ctx.output,
            args.yes,
            "Send this order? The cart will be emptied",
            true,
        )?
    {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let handoff = checkout(&store, &config).context("Checkout failed")?;
    ctx.report_persist_warning(&store);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "url": handoff.url,
            "message": handoff.message,
            "order": handoff.order,
        }));
        return Ok(());
    }

    ctx.output.header("Order message");
    println!("{}", handoff.message);
    println!();
    ctx.output.success("Open this link to send the order:");
    println!("{}", handoff.url);
    Ok(())
}
