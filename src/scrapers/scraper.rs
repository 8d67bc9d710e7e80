use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

/// Fetch capability used by the engine: one request in, one response or failure out.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse>;
    fn stats(&self) -> &StatsTracker;
    fn set_stats(&mut self, stats: Arc<StatsTracker>);

    async fn fetch(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        let start_time = Utc::now();
        let url = request.url.clone();

        info!("Fetching URL: {}", url);
        debug!("Using identity: {}", request.identity);

        match self.fetch_single(request).await {
            Ok(response) => {
                debug!(
                    "Received response: status={}, body_length={}",
                    response.status,
                    response.body.len()
                );
                let duration = Utc::now().signed_duration_since(start_time);
                self.stats()
                    .record_request(response.status, response.body.len(), duration);
                Ok(response)
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                self.stats().record_transport_error();
                Err(e)
            }
        }
    }
}
