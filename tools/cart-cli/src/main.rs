//! Cart CLI - Command line front end for the TurboCommerce cart store.
//!
//! Commands:
//! - `cart add` - Add a product to the cart
//! - `cart remove` - Remove a product line
//! - `cart set` - Set a line's quantity
//! - `cart clear` - Empty the cart
//! - `cart show` - Show the cart and its totals
//! - `cart checkout` - Build the order message and handoff link
//! - `cart config` - Inspect configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, CheckoutArgs, ClearArgs, ConfigArgs, RemoveArgs, SetArgs};

/// Cart CLI - Manage a persisted shopping cart from the terminal
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use a named cart instead of the default one
    #[arg(short, long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a product line from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a line (0 or less removes it)
    Set(SetArgs),

    /// Remove every line from the cart
    Clear(ClearArgs),

    /// Show the cart contents and totals
    Show,

    /// Hand the order off to the messaging channel
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, cli.profile.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args, &ctx),
        Commands::Remove(args) => commands::remove::run(args, &ctx),
        Commands::Set(args) => commands::set::run(args, &ctx),
        Commands::Clear(args) => commands::clear::run(args, &ctx),
        Commands::Show => commands::show::run(&ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` or `debug` under `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
