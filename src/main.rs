//! media-grab - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::{fmt, EnvFilter};

use media_grab::{
    api::SessionTokenCache,
    cli::Args,
    config::{validate_config, Config},
    download::{DeliveryOutcome, DirectoryDelivery, EventSink, Orchestrator, RunTotals, StatusEvent},
    error::{exit_codes, Error, Result},
    extract::YtDlpEngine,
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_event, print_info,
        print_outcome, print_totals, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    let urls = args.merge_into_config(&mut config);

    validate_config(&config)?;
    print_config_summary(&config, urls.len());

    let orchestrator = Arc::new(Orchestrator::from_config(
        &config,
        Arc::new(YtDlpEngine::from_config(&config)),
        Arc::new(DirectoryDelivery::new(config.output_directory())),
        Arc::new(SessionTokenCache::new()),
    )?);

    let mut totals = RunTotals::default();

    for text in &urls {
        let outcome = process_text(&orchestrator, text).await?;
        print_outcome(text, &outcome);
        totals.add(&outcome);
    }

    print_totals(&totals);

    Ok(totals.exit_code())
}

/// Run one inbound text on a background task, rendering its events as they arrive.
async fn process_text(orchestrator: &Arc<Orchestrator>, text: &str) -> Result<DeliveryOutcome> {
    let (events, mut rx) = EventSink::channel();
    let task = {
        let orchestrator = Arc::clone(orchestrator);
        let text = text.to_string();
        tokio::spawn(async move { orchestrator.handle_text(&text, &events).await })
    };

    let spinner = create_spinner(&format!("Processing {}", text));
    while let Some(event) = rx.next().await {
        match &event {
            StatusEvent::Progress(message) => spinner.set_message(message.clone()),
            other => spinner.suspend(|| print_event(other)),
        }
    }
    spinner.finish_and_clear();

    task.await
        .map_err(|e| Error::Delivery(format!("Request task failed: {}", e)))
}
