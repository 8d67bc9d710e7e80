use reqwest::header::{HeaderName, HeaderValue};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::SinkMode;

use super::{ScraperError, ScraperResult};

pub const DEFAULT_URL_COLUMN: &str = "Product URL";
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-IN,en-GB;q=0.9,en-US;q=0.8,en;q=0.7";

/// Everything the engine and its collaborators need for one run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub input_path: PathBuf,
    pub url_column: String,
    pub output_path: PathBuf,
    pub identity_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub request_timeout: Duration,
    /// Fixed `Cookie` value sent with every request to keep the site session alive.
    pub session_cookie: Option<String>,
    pub headers: Vec<(String, String)>,
    pub sink_mode: SinkMode,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/product_urls.csv"),
            url_column: DEFAULT_URL_COLUMN.to_string(),
            output_path: PathBuf::from("data/products.csv"),
            identity_path: PathBuf::from("data/user_agents.txt"),
            checkpoint_path: PathBuf::from("data/checkpoint.txt"),
            min_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(6),
            request_timeout: Duration::from_secs(30),
            session_cookie: None,
            headers: vec![
                ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
                (
                    "Accept-Language".to_string(),
                    DEFAULT_ACCEPT_LANGUAGE.to_string(),
                ),
                ("Cache-Control".to_string(), "no-cache".to_string()),
            ],
            sink_mode: SinkMode::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn with_input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.input_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_url_column(mut self, column: impl Into<String>) -> Self {
        self.url_column = column.into();
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_identities<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.identity_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_checkpoint<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.checkpoint_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Self {
        for (key, value) in headers {
            self.headers
                .retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
            self.headers.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn with_sink_mode(mut self, mode: SinkMode) -> Self {
        self.sink_mode = mode;
        self
    }

    /// Headers attached to every request besides the rotating user agent.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if let Some(cookie) = &self.session_cookie {
            headers.push(("Cookie".to_string(), cookie.clone()));
        }
        headers
    }

    pub fn validate(&self) -> ScraperResult<()> {
        if self.min_delay > self.max_delay {
            return Err(ScraperError::config(format!(
                "min delay {:?} is greater than max delay {:?}",
                self.min_delay, self.max_delay
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ScraperError::config("request timeout must be non-zero"));
        }
        if self.url_column.trim().is_empty() {
            return Err(ScraperError::config("URL column name must not be empty"));
        }
        for (name, value) in self.request_headers() {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ScraperError::config(format!("invalid header name {:?}: {}", name, e))
            })?;
            HeaderValue::from_str(&value).map_err(|e| {
                ScraperError::config(format!("invalid value for header {}: {}", name, e))
            })?;
        }
        Ok(())
    }
}
