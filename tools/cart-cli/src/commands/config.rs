//! Configuration commands.

use anyhow::Result;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout_config()?;
    let saved = ctx.saved_carts()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "config_file": ctx.config_path.as_ref().map(|p| p.display().to_string()),
            "storage": {
                "dir": ctx.storage_dir().display().to_string(),
                "key": ctx.config.storage.key,
                "profile": ctx.config.storage.profile,
                "slot": ctx.config.storage.slot_key(),
                "saved_carts": saved,
            },
            "checkout": {
                "recipient_id": checkout.recipient_id,
                "message_prefix": checkout.prefix(),
                "currency": checkout.currency.code(),
                "base_url": checkout.base_url,
            },
        }));
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());
    ctx.output.kv("key", &ctx.config.storage.key);
    if let Some(profile) = &ctx.config.storage.profile {
        ctx.output.kv("profile", profile);
    }
    ctx.output.kv("slot", &ctx.config.storage.slot_key());
    if !saved.is_empty() {
        ctx.output.kv("saved carts", &saved.join(", "));
    }

    ctx.output.info("");
    ctx.output.info("[checkout]");
    if checkout.recipient_id.trim().is_empty() {
        ctx.output.kv("recipient_id", "(not set)");
    } else {
        ctx.output.kv("recipient_id", &checkout.recipient_id);
    }
    ctx.output.kv("message_prefix", checkout.prefix());
    ctx.output.kv("currency", checkout.currency.code());
    ctx.output.kv("base_url", &checkout.base_url);

    Ok(())
}
