use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::Scraper;
use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperResult, StatsTracker};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed transport. The user agent and every other header come from the request.
#[derive(Clone)]
pub struct HttpScraper {
    client: Client,
    stats: Arc<StatsTracker>,
}

impl HttpScraper {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            client: Self::build_client(DEFAULT_TIMEOUT)?,
            stats: Arc::new(StatsTracker::new()),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ScraperResult<Self> {
        self.client = Self::build_client(timeout)?;
        Ok(self)
    }

    fn build_client(timeout: Duration) -> ScraperResult<Client> {
        Ok(ClientBuilder::new().timeout(timeout).build()?)
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        let mut req = self
            .client
            .get(request.url.clone())
            .header(header::USER_AGENT, request.identity.as_str());

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let start_time = Utc::now();
        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);
        let body = response.text().await?;

        Ok(HttpResponse {
            url: request.url,
            status,
            headers,
            body,
            timestamp: start_time,
        })
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    fn set_stats(&mut self, stats: Arc<StatsTracker>) {
        self.stats = stats;
    }
}
