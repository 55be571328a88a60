//! Add a product to the cart.

use anyhow::{Context as _, Result};
use turbo_cart::prelude::*;

use super::{product_id, AddArgs};
use crate::context::Context;

/// Run the add command.
pub fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout_config()?;
    let price = Price::parse(&args.price, checkout.currency.decimal_places())
        .with_context(|| format!("Cannot add '{}'", args.name))?;

    let store = ctx.open_store()?;
    let product = Product::new(product_id(&args.id), args.name, price, args.image);
    let name = product.name.clone();
    let quantity = store.add_to_cart(product);
    ctx.report_persist_warning(&store);

    if ctx.output.is_json() {
        ctx.output.json(&store.snapshot());
    } else {
        ctx.output
            .success(&format!("Added {} (now x{} in cart)", name, quantity));
    }
    Ok(())
}
