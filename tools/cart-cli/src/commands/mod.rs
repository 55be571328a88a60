//! CLI command implementations.

pub mod add;
pub mod checkout;
pub mod clear;
pub mod config;
pub mod remove;
pub mod set;
pub mod show;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use turbo_cart::ProductId;

use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id (integers are numeric ids, anything else a text key).
    pub id: String,

    /// Product name.
    pub name: String,

    /// Unit price as a decimal amount, e.g. 12.50.
    pub price: String,

    /// Product image URL.
    #[arg(short, long, default_value = "")]
    pub image: String,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id.
    pub id: String,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Product id.
    pub id: String,

    /// New quantity.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt (required with --json).
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Skip confirmation prompt (required with --json).
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
}

/// Parse a product id typed on the command line.
pub fn product_id(input: &str) -> ProductId {
    match input.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

/// Ask before a destructive change unless `yes` was passed.
///
/// JSON output has no prompt, so it needs `--yes`.
pub fn confirm(output: &Output, yes: bool, prompt: &str, default: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if output.is_json() {
        bail!("Refusing to change the cart without confirmation; pass --yes with --json");
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
