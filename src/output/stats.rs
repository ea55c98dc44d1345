//! Outcome reporting.

use console::style;

use crate::download::{DeliveryOutcome, OutcomeClass, RunTotals};

/// Print the outcome of one request.
pub fn print_outcome(url: &str, outcome: &DeliveryOutcome) {
    let label = match outcome.class {
        OutcomeClass::Delivered => style("delivered").green(),
        OutcomeClass::PartiallyDelivered => style("partial").yellow(),
        OutcomeClass::DirectLink => style("direct link").yellow(),
        OutcomeClass::Failed => style("failed").red(),
    };

    println!(
        "{} {}: {} delivered, {} failed",
        label, url, outcome.delivered, outcome.failed
    );
}

/// Print totals across every request of the run.
pub fn print_totals(totals: &RunTotals) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Summary:").bold());
    println!("  Links processed: {}", totals.requests_processed);
    if totals.requests_failed > 0 {
        println!("  Links failed:    {}", style(totals.requests_failed).red());
    }
    if totals.requests_partial > 0 {
        println!("  Links partial:   {}", style(totals.requests_partial).yellow());
    }
    println!("  Files delivered: {}", style(totals.files_delivered).green());
    println!("  Direct links:    {}", totals.links_offered);
    println!("  Items skipped:   {}", totals.items_failed);
    println!("{}", style("═".repeat(50)).dim());
}
