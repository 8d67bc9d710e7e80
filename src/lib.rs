pub mod cli;
pub mod core;
pub mod http;
pub mod identity;
pub mod input;
pub mod parser;
pub mod scrapers;
pub mod stats;
pub mod storage;

pub use self::core::{RunOutcome, RunSummary, ScrapeConfig, ScrapeEngine};
pub use self::core::{ScraperError, ScraperResult};
pub use http::{HttpRequest, HttpResponse};
pub use identity::IdentityPool;
pub use parser::{JsonLdParser, Parser, ProductRecord};
pub use scrapers::Scraper;
pub use stats::StatsTracker;
pub use storage::{CsvStorage, SinkMode, StorageBackend};
