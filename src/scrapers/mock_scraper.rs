use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperError, ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::Scraper;

#[derive(Clone, Debug)]
pub enum MockResponse {
    Page { status: u16, body: String },
    TransportError,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        MockResponse::Page {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        MockResponse::Page {
            status,
            body: String::new(),
        }
    }
}

/// Fake transport serving canned responses by URL. Unknown URLs answer 404.
#[derive(Clone)]
pub struct MockScraper {
    responses: Arc<HashMap<String, MockResponse>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    stats: Arc<StatsTracker>,
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(HashMap::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(StatsTracker::new()),
        }
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        let key = Url::parse(url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        Arc::make_mut(&mut self.responses).insert(key, response);
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.url.to_string())
            .collect()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        self.requests.lock().push(request.clone());

        let response = self
            .responses
            .get(request.url.as_str())
            .cloned()
            .unwrap_or_else(|| MockResponse::status(404));

        match response {
            MockResponse::Page { status, body } => Ok(HttpResponse {
                url: request.url,
                status,
                headers: HashMap::new(),
                body,
                timestamp: Utc::now(),
            }),
            MockResponse::TransportError => Err(ScraperError::FetchError {
                url: request.url.to_string(),
                reason: "simulated transport failure".to_string(),
            }),
        }
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    fn set_stats(&mut self, stats: Arc<StatsTracker>) {
        self.stats = stats;
    }
}
