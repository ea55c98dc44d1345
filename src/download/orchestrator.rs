//! Drives one download request end to end.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};

use crate::api::{AggregationClient, ResolveFailure, ResolvedItem, SessionTokenCache};
use crate::config::Config;
use crate::download::delivery::Delivery;
use crate::download::events::{format_megabytes, Delivered, EventSink, StatusEvent};
use crate::download::outcome::DeliveryOutcome;
use crate::error::{Error, Result};
use crate::extract::{ExtractionClient, ExtractionEngine, TierOutcome};
use crate::fs::{delivery_filename, picker_filename, LocalArtifact};
use crate::media::{parse_media_url, DownloadRequest, PickerItem, Provider, ProviderRouter};

/// Routes a request to a provider, applies the size budget and fallbacks,
/// hands artifacts to delivery and removes them afterwards.
///
/// Shared across concurrent requests; the session token cache inside the
/// aggregation client is the only mutable state.
pub struct Orchestrator {
    router: ProviderRouter,
    extraction: ExtractionClient,
    aggregation: AggregationClient,
    delivery: Arc<dyn Delivery>,
    max_concurrent_items: usize,
}

impl Orchestrator {
    pub fn new(
        router: ProviderRouter,
        extraction: ExtractionClient,
        aggregation: AggregationClient,
        delivery: Arc<dyn Delivery>,
        max_concurrent_items: usize,
    ) -> Self {
        Self {
            router,
            extraction,
            aggregation,
            delivery,
            max_concurrent_items: max_concurrent_items.max(1),
        }
    }

    /// Build an orchestrator from configuration.
    pub fn from_config(
        config: &Config,
        engine: Arc<dyn ExtractionEngine>,
        delivery: Arc<dyn Delivery>,
        tokens: Arc<SessionTokenCache>,
    ) -> Result<Self> {
        Ok(Self::new(
            ProviderRouter::new(&config.extraction.domains),
            ExtractionClient::from_config(config, engine),
            AggregationClient::new(config, tokens)?,
            delivery,
            config.options.max_concurrent_items,
        ))
    }

    /// Handle inbound text on a background task and stream its status events.
    ///
    /// The stream ends once the request has finished. Must be called from
    /// within a Tokio runtime.
    pub fn submit(self: &Arc<Self>, input: &str) -> impl Stream<Item = StatusEvent> + Unpin + Send {
        let (events, rx) = EventSink::channel();
        let this = Arc::clone(self);
        let input = input.to_string();

        tokio::spawn(async move {
            this.handle_text(&input, &events).await;
        });

        rx
    }

    /// Extract a URL from inbound text and run it.
    pub async fn handle_text(&self, text: &str, events: &EventSink) -> DeliveryOutcome {
        match parse_media_url(text) {
            Ok(url) => self.run(&DownloadRequest::new(url), events).await,
            Err(Error::InvalidInput(message)) => {
                events.failed(message);
                DeliveryOutcome::failed()
            }
            Err(e) => {
                events.failed(e.to_string());
                DeliveryOutcome::failed()
            }
        }
    }

    /// Run one request. Every failure ends up as a status event; no
    /// artifact file remains on disk when this returns.
    pub async fn run(&self, request: &DownloadRequest, events: &EventSink) -> DeliveryOutcome {
        let provider = self.router.classify(&request.url);
        tracing::info!(
            "Request {} for {} via {} provider",
            request.id,
            request.url,
            provider
        );

        let outcome = match provider {
            Provider::Extraction => self.run_extraction(request, events).await,
            Provider::Aggregation => self.run_aggregation(request, events).await,
        };

        tracing::info!("Request {} finished: {:?}", request.id, outcome);
        outcome
    }

    async fn run_extraction(&self, request: &DownloadRequest, events: &EventSink) -> DeliveryOutcome {
        let ladder = self.extraction.ladder();
        let mut tier_index = 0;

        loop {
            if let Some(tier) = ladder.get(tier_index) {
                events.progress(format!("Downloading video at {}...", tier));
            }

            match self.extraction.fetch(request, tier_index).await {
                Ok(TierOutcome::Fits(artifact)) => {
                    return match self.deliver(artifact, events).await {
                        Ok(()) => DeliveryOutcome::delivered(1),
                        Err(e) => {
                            events.failed(format!("Failed to send video: {}", e));
                            DeliveryOutcome::failed()
                        }
                    };
                }
                Ok(TierOutcome::TooLarge { size_bytes }) => {
                    tier_index += 1;
                    events.progress(format!(
                        "Video is {}, retrying at lower quality...",
                        format_megabytes(size_bytes)
                    ));
                }
                Err(e) => {
                    events.failed(extraction_failure_message(&request.url, &e));
                    return DeliveryOutcome::failed();
                }
            }
        }
    }

    async fn run_aggregation(&self, request: &DownloadRequest, events: &EventSink) -> DeliveryOutcome {
        events.progress("Processing link...");

        match self.aggregation.resolve(&request.url).await {
            ResolvedItem::Failure(failure) => {
                events.failed(resolve_failure_message(&request.url, &failure));
                DeliveryOutcome::failed()
            }
            ResolvedItem::SingleFile { locator, filename } => {
                self.run_single_file(request, &locator, &filename, events)
                    .await
            }
            ResolvedItem::MultiItem(items) => self.run_picker(request, items, events).await,
        }
    }

    async fn run_single_file(
        &self,
        request: &DownloadRequest,
        locator: &str,
        filename: &str,
        events: &EventSink,
    ) -> DeliveryOutcome {
        events.progress("Downloading file...");

        match self
            .aggregation
            .fetch_bytes(locator, &request.attempt_stem("file"))
            .await
        {
            Ok(artifact) => {
                let artifact = artifact.with_filename(delivery_filename(Some(filename)));
                match self.deliver(artifact, events).await {
                    Ok(()) => DeliveryOutcome::delivered(1),
                    Err(e) => {
                        events.failed(format!("Failed to send file: {}\nDirect link: {}", e, locator));
                        DeliveryOutcome::failed()
                    }
                }
            }
            Err(Error::Oversize { size_bytes, .. }) => {
                tracing::info!("Offering direct link for {}", request.url);
                events.delivered(Delivered::Link {
                    url: locator.to_string(),
                    size_bytes,
                });
                DeliveryOutcome::direct_link()
            }
            Err(e) => {
                events.failed(format!("Download failed: {}\nDirect link: {}", e, locator));
                DeliveryOutcome::failed()
            }
        }
    }

    async fn run_picker(
        &self,
        request: &DownloadRequest,
        items: Vec<PickerItem>,
        events: &EventSink,
    ) -> DeliveryOutcome {
        let total = items.len();
        events.progress(format!("Found {} items, downloading...", total));

        let attempts: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.attempt_picker_item(request, index, item, events))
            .collect();

        let results: Vec<Result<()>> = stream::iter(attempts)
            .buffered(self.max_concurrent_items)
            .collect()
            .await;

        let outcome = DeliveryOutcome::from_results(&results);
        if outcome.delivered == 0 {
            events.failed(format!("None of the {} items could be downloaded: {}", total, request.url));
        } else if outcome.failed > 0 {
            events.progress(format!(
                "Delivered {} of {} items, {} skipped",
                outcome.delivered, total, outcome.failed
            ));
        }

        outcome
    }

    async fn attempt_picker_item(
        &self,
        request: &DownloadRequest,
        index: usize,
        item: PickerItem,
        events: &EventSink,
    ) -> Result<()> {
        let result = self.deliver_picker_item(request, index, item, events).await;
        if let Err(e) = &result {
            tracing::warn!("Skipping item {} of {}: {}", index + 1, request.url, e);
        }
        result
    }

    async fn deliver_picker_item(
        &self,
        request: &DownloadRequest,
        index: usize,
        item: PickerItem,
        events: &EventSink,
    ) -> Result<()> {
        let locator = item
            .locator
            .ok_or_else(|| Error::InvalidInput(format!("Item {} has no URL", index + 1)))?;

        let artifact = self
            .aggregation
            .fetch_bytes(&locator, &request.attempt_stem(&format!("item{}", index)))
            .await?;

        let filename = picker_filename(index, &locator, artifact.content_type.as_deref(), item.kind);
        let artifact = artifact.with_kind(item.kind).with_filename(filename);

        self.deliver(artifact, events).await
    }

    /// Hand an artifact to delivery, then delete it whatever the result.
    async fn deliver(&self, artifact: LocalArtifact, events: &EventSink) -> Result<()> {
        events.progress(format!("Sending {}...", artifact.filename));

        let result = self.delivery.deliver(&artifact).await;
        let filename = artifact.filename.clone();
        let size_bytes = artifact.size_bytes;

        artifact.discard().await;
        result?;

        events.delivered(Delivered::File {
            filename,
            size_bytes,
        });
        Ok(())
    }
}

fn extraction_failure_message(url: &str, e: &Error) -> String {
    match e {
        Error::Oversize {
            size_bytes,
            budget_bytes,
        } => format!(
            "Video is too large even at the lowest quality ({} > {}): {}",
            format_megabytes(*size_bytes),
            format_megabytes(*budget_bytes),
            url
        ),
        other => format!("Download failed: {}\nLink: {}", other, url),
    }
}

fn resolve_failure_message(url: &str, failure: &ResolveFailure) -> String {
    match failure {
        ResolveFailure::Backend { code } => format!(
            "Could not process the link (error: {}). Check that the link is correct: {}",
            code, url
        ),
        ResolveFailure::Transport { detail } => {
            format!("Download service unavailable: {}\nLink: {}", detail, url)
        }
        other => format!("Could not process the link ({}): {}", other.code(), url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_failure_message_carries_code_and_url() {
        let message = resolve_failure_message(
            "https://example.com/a",
            &ResolveFailure::Backend {
                code: "error.api.link.invalid".into(),
            },
        );
        assert!(message.contains("error.api.link.invalid"));
        assert!(message.contains("https://example.com/a"));

        let message = resolve_failure_message(
            "https://example.com/a",
            &ResolveFailure::UnsupportedStatus {
                status: "local-processing".into(),
            },
        );
        assert!(message.contains("unsupported-status"));
    }

    #[test]
    fn test_extraction_oversize_message() {
        let message = extraction_failure_message(
            "https://youtu.be/x",
            &Error::Oversize {
                size_bytes: 80 * 1024 * 1024,
                budget_bytes: 50 * 1024 * 1024,
            },
        );
        assert!(message.contains("80.0 MB > 50.0 MB"));
        assert!(message.contains("https://youtu.be/x"));
    }
}
