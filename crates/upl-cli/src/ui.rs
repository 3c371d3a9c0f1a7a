//! Console output: event observer and package tables.

use comfy_table::{ContentArrangement, Table, presets};
use crossterm::style::Stylize;

use upl_core::{PackageRecord, TransactionObserver};

/// Observer printing transaction events as they arrive.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    quiet: bool,
}

impl ConsoleObserver {
    /// Create an observer; `quiet` suppresses progress chatter.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl TransactionObserver for ConsoleObserver {
    fn action_started(&self, action: &str) {
        if !self.quiet {
            println!("  {action}");
        }
    }

    fn action_progress(&self, action: &str, status: &str, percent: f64) {
        if !self.quiet {
            println!("  {action} {status} {percent:.0}%");
        }
    }

    fn hook_progress(&self, action: &str, details: &str, status: &str, _percent: f64) {
        if !self.quiet {
            println!("  {action} {details} {status}");
        }
    }

    fn warning(&self, message: &str) {
        println!("  {} {message}", "WARNING:".yellow().bold());
    }

    fn error(&self, message: &str) {
        println!("  {} {message}", "ERROR:".red().bold());
    }

    fn finished(&self, success: bool) {
        println!();
        if success {
            println!("TRANSACTION COMPLETE");
        } else {
            println!("TRANSACTION FAILED");
        }
    }
}

/// Render package records as a table.
pub fn package_table(records: &[PackageRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["NAME", "VERSION", "BACKEND", "DESCRIPTION"]);

    for record in records {
        table.add_row(vec![
            record.name.to_string(),
            record.version.clone().unwrap_or_else(|| "?".to_string()),
            record.format.to_string(),
            record.description.clone().unwrap_or_default(),
        ]);
    }

    table
}
