//! Console output utilities.

use console::style;

use crate::config::Config;
use crate::download::{format_megabytes, Delivered, StatusEvent};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     media-grab                                        ║
║     Fetch videos and photos from a link               ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(config: &Config, url_count: usize) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Links:      {}", url_count);
    println!("  Backend:    {}", config.aggregation.endpoint);
    println!(
        "  Budget:     {} ({})",
        config.size_budget(),
        config.limits.budget_mode
    );
    println!("  Engine:     {}", config.extraction.binary);
    println!("  Output:     {}", config.output_directory().display());
    println!();
}

/// Render a terminal status event. Progress events are shown on the spinner instead.
pub fn print_event(event: &StatusEvent) {
    match event {
        StatusEvent::Progress(text) => print_info(text),
        StatusEvent::Delivered(Delivered::File {
            filename,
            size_bytes,
        }) => print_success(&format!(
            "Delivered {} ({})",
            filename,
            format_megabytes(*size_bytes)
        )),
        StatusEvent::Delivered(Delivered::Link { url, size_bytes }) => print_warning(&format!(
            "File is too large to send ({}+). Direct link:\n  {}",
            format_megabytes(*size_bytes),
            url
        )),
        StatusEvent::Failed(message) => print_error(message),
    }
}
