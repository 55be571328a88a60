//! Set a line's quantity.

use anyhow::Result;

use super::{product_id, SetArgs};
use crate::context::Context;

/// Run the set command.
pub fn run(args: SetArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let id = product_id(&args.id);
    let changed = store.update_quantity(&id, args.quantity);
    ctx.report_persist_warning(&store);

    if ctx.output.is_json() {
        ctx.output.json(&store.snapshot());
        return Ok(());
    }

    match (changed, store.snapshot().get(&id)) {
        (true, Some(entry)) => ctx
            .output
            .success(&format!("{} quantity set to {}", entry.name, entry.quantity)),
        (true, None) => ctx.output.success(&format!("Removed {}", args.id)),
        (false, Some(_)) => ctx.output.info("Quantity unchanged"),
        (false, None) => ctx.output.info(&format!("{} is not in the cart", args.id)),
    }
    Ok(())
}
