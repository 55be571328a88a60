//! Remove a product line.

use anyhow::Result;

use super::{product_id, RemoveArgs};
use crate::context::Context;

/// Run the remove command.
pub fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let removed = store.remove_from_cart(&product_id(&args.id));
    ctx.report_persist_warning(&store);

    if ctx.output.is_json() {
        ctx.output.json(&store.snapshot());
    } else if removed {
        ctx.output.success(&format!("Removed {}", args.id));
    } else {
        ctx.output.info(&format!("{} is not in the cart", args.id));
    }
    Ok(())
}
