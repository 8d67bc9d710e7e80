use log::{debug, info, warn};
use std::sync::Arc;
use tokio::time::sleep;
use url::Url;

use super::checkpoint::Checkpoint;
use super::config::ScrapeConfig;
use super::random::{RandomSource, StdRandom};
use super::{ScraperError, ScraperResult};
use crate::http::HttpRequest;
use crate::identity::IdentityPool;
use crate::parser::{JsonLdParser, Parser};
use crate::stats::StatsTracker;
use crate::storage::StorageBackend;
use crate::Scraper;

#[cfg(test)]
mod tests;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// No identity was available; the run stopped without error.
    PoolExhausted,
}

/// Terminal state of one URL before its checkpoint is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOutcome {
    Extracted(usize),
    ExtractEmpty,
    FetchFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub start_index: usize,
    /// Checkpoint value when the run ended.
    pub end_index: usize,
    pub processed: usize,
    pub records_written: usize,
    pub fetch_failures: usize,
    pub outcome: RunOutcome,
}

impl RunSummary {
    fn starting_at(index: usize) -> Self {
        Self {
            start_index: index,
            end_index: index,
            processed: 0,
            records_written: 0,
            fetch_failures: 0,
            outcome: RunOutcome::Completed,
        }
    }
}

/// Sequential, checkpointed scraping loop.
///
/// Each URL is attempted exactly once per run. Whatever the fetch or extraction outcome, the
/// checkpoint advances to `index + 1` before the next URL is touched, so a killed process resumes
/// at the first URL that was not fully handled.
pub struct ScrapeEngine {
    scraper: Box<dyn Scraper>,
    parser: Box<dyn Parser>,
    rng: Box<dyn RandomSource>,
    checkpoint: Checkpoint,
    config: ScrapeConfig,
    stats: Arc<StatsTracker>,
}

impl ScrapeEngine {
    pub fn new(scraper: Box<dyn Scraper>, config: ScrapeConfig) -> ScraperResult<Self> {
        config.validate()?;
        info!("Initializing scrape engine");
        if config.session_cookie.is_none() {
            info!("No session cookie configured; requests carry no Cookie header");
        }

        let stats = Arc::new(StatsTracker::new());
        let mut scraper = scraper;
        scraper.set_stats(Arc::clone(&stats));

        Ok(Self {
            scraper,
            parser: Box::new(JsonLdParser::new()),
            rng: Box::new(StdRandom::new()),
            checkpoint: Checkpoint::new(&config.checkpoint_path),
            config,
            stats,
        })
    }

    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    pub async fn run<S>(
        &mut self,
        urls: &[Url],
        pool: &IdentityPool,
        sink: &mut S,
    ) -> ScraperResult<RunSummary>
    where
        S: StorageBackend + ?Sized,
    {
        let total = urls.len();
        let mut start = self.checkpoint.read();
        if start > total {
            warn!(
                "Checkpoint {} is past the end of {} URLs; treating the list as done",
                start, total
            );
            start = total;
        }

        sink.initialize(start > 0).await?;

        let mut summary = RunSummary::starting_at(start);
        if start == total {
            info!("All {} URLs already processed", total);
        }

        for (index, url) in urls.iter().enumerate().skip(start) {
            let Some(identity) = pool.pick(self.rng.as_mut()) else {
                warn!("No user agents available; stopping at index {}", index);
                summary.outcome = RunOutcome::PoolExhausted;
                break;
            };

            info!("Scraping {} (Index: {})", url, index);
            let outcome = self.process_url(url, identity, sink).await?;
            debug!("Index {} finished as {:?}", index, outcome);

            match outcome {
                UrlOutcome::Extracted(count) => summary.records_written += count,
                UrlOutcome::FetchFailed => summary.fetch_failures += 1,
                UrlOutcome::ExtractEmpty => {}
            }

            self.checkpoint.write(index + 1)?;
            summary.processed += 1;
            summary.end_index = index + 1;

            if index + 1 < total {
                let delay = self
                    .rng
                    .delay_between(self.config.min_delay, self.config.max_delay);
                info!("Waiting for {:.1} seconds...", delay.as_secs_f64());
                sleep(delay).await;
            }
        }

        self.stats.finish();
        info!(
            "Run finished ({:?}): {} URLs processed, {} products written, {} fetch failures, checkpoint at {}",
            summary.outcome,
            summary.processed,
            summary.records_written,
            summary.fetch_failures,
            summary.end_index
        );
        Ok(summary)
    }

    async fn process_url<S>(
        &self,
        url: &Url,
        identity: &str,
        sink: &mut S,
    ) -> ScraperResult<UrlOutcome>
    where
        S: StorageBackend + ?Sized,
    {
        let mut request = HttpRequest::new(url.clone(), identity);
        for (key, value) in self.config.request_headers() {
            request = request.with_header(key, value);
        }

        let response = match self.scraper.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to retrieve the page at {}: {}", url, e);
                return Ok(UrlOutcome::FetchFailed);
            }
        };

        if !response.is_success() {
            let error = ScraperError::FetchError {
                url: url.to_string(),
                reason: format!("status code {}", response.status),
            };
            warn!("{}", error);
            return Ok(UrlOutcome::FetchFailed);
        }

        let report = self.parser.parse(&response.body);
        if report.decode_errors > 0 {
            self.stats.record_decode_errors(report.decode_errors);
        }
        if report.products.is_empty() {
            info!(
                "No complete product in {} JSON-LD blocks at {}",
                report.blocks, url
            );
            return Ok(UrlOutcome::ExtractEmpty);
        }

        let count = report.products.len();
        for candidate in report.products {
            sink.store(&candidate.into_record(url.as_str())).await?;
        }
        sink.flush().await?;
        self.stats.record_products(count);

        info!("Stored {} products from {}", count, url);
        Ok(UrlOutcome::Extracted(count))
    }
}
