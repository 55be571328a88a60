//! Empty the cart.

use anyhow::Result;

use super::{confirm, ClearArgs};
use crate::context::Context;

/// Run the clear command.
pub fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let snapshot = store.snapshot();
    if snapshot.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    let prompt = format!("Remove {} item(s) from the cart?", snapshot.total_items);
    if !confirm(&ctx.output, args.yes, &prompt, false)? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    store.clear_cart();
    ctx.report_persist_warning(&store);

    if ctx.output.is_json() {
        ctx.output.json(&store.snapshot());
    } else {
        ctx.output.success("Cart cleared");
    }
    Ok(())
}
