//! Show the cart.

use anyhow::Result;

use crate::context::Context;

/// Run the show command.
pub fn run(ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout_config()?;
    let store = ctx.open_store()?;
    ctx.output.cart(&store.snapshot(), checkout.currency);
    Ok(())
}
