//! Command-line surface of the `jsonld-scraper` binary.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::{ScrapeConfig, DEFAULT_URL_COLUMN};
use crate::storage::SinkMode;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "jsonld-scraper",
    about = "Resumable JSON-LD product scraper with rotating user agents"
)]
pub struct Cli {
    /// CSV file listing the product URLs to scrape
    #[arg(long, env = "JSONLD_SCRAPER_URLS", default_value = "data/product_urls.csv")]
    pub urls: PathBuf,

    /// Column of the URL file holding the addresses
    #[arg(long, env = "JSONLD_SCRAPER_URL_COLUMN", default_value = DEFAULT_URL_COLUMN)]
    pub url_column: String,

    /// Newline-delimited file of accepted user agents
    #[arg(long, env = "JSONLD_SCRAPER_USER_AGENTS", default_value = "data/user_agents.txt")]
    pub user_agents: PathBuf,

    /// CSV output file
    #[arg(long, env = "JSONLD_SCRAPER_OUTPUT", default_value = "data/products.csv")]
    pub output: PathBuf,

    /// File holding the index of the next URL to process
    #[arg(long, env = "JSONLD_SCRAPER_CHECKPOINT", default_value = "data/checkpoint.txt")]
    pub checkpoint: PathBuf,

    /// Lower bound of the pause between requests, in milliseconds
    #[arg(long, env = "JSONLD_SCRAPER_MIN_DELAY_MS", default_value_t = 3000)]
    pub min_delay_ms: u64,

    /// Upper bound of the pause between requests, in milliseconds
    #[arg(long, env = "JSONLD_SCRAPER_MAX_DELAY_MS", default_value_t = 6000)]
    pub max_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "JSONLD_SCRAPER_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Session cookie sent with every request
    #[arg(long, env = "JSONLD_SCRAPER_COOKIE")]
    pub cookie: Option<String>,

    /// Start a new output file even when resuming (drops rows from the interrupted run)
    #[arg(long, env = "JSONLD_SCRAPER_TRUNCATE_OUTPUT", default_value_t = false)]
    pub truncate_output: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, env = "JSONLD_SCRAPER_LOG", default_value = "info", value_parser = parse_level)]
    pub log_level: log::LevelFilter,
}

fn parse_level(value: &str) -> Result<log::LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level {:?}", value))
}

impl Cli {
    pub fn build_config(&self) -> ScrapeConfig {
        let mut config = ScrapeConfig::default()
            .with_input(&self.urls)
            .with_url_column(self.url_column.clone())
            .with_identities(&self.user_agents)
            .with_output(&self.output)
            .with_checkpoint(&self.checkpoint)
            .with_delay(
                Duration::from_millis(self.min_delay_ms),
                Duration::from_millis(self.max_delay_ms),
            )
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_sink_mode(if self.truncate_output {
                SinkMode::Truncate
            } else {
                SinkMode::ResumeAppend
            });

        if let Some(cookie) = &self.cookie {
            config = config.with_session_cookie(cookie.clone());
        }
        config
    }
}
