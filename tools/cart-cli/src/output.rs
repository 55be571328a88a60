//! Output formatting for the CLI.

use console::style;
use turbo_cart::prelude::*;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Print the badge line and item table for a cart snapshot.
    pub fn cart(&self, snapshot: &CartSnapshot, currency: Currency) {
        if self.json {
            self.json(snapshot);
            return;
        }

        println!("{}", cart_badge(snapshot));
        if snapshot.is_empty() {
            println!("  {}", style("Your cart is empty").dim());
            return;
        }

        let widths = [10, 28, 5, 12];
        println!();
        self.table_row(&["ID", "PRODUCT", "QTY", "TOTAL"], &widths);
        for entry in &snapshot.entries {
            let id = entry.id.to_string();
            let quantity = entry.quantity.to_string();
            let total = entry.line_total().display(currency);
            self.table_row(&[&id, &entry.name, &quantity, &total], &widths);
        }
        println!();
        self.kv("Total", &snapshot.total_price.display(currency));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Cart icon with the item count, as shown in a storefront header.
pub fn cart_badge(snapshot: &CartSnapshot) -> String {
    match snapshot.badge_count() {
        Some(count) => format!("🛒 {}", style(format!("({})", count)).green().bold()),
        None => "🛒".to_string(),
    }
}
