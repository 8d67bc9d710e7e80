pub mod checkpoint;
pub mod config;
pub mod engine;
mod errors;
pub mod random;

pub use checkpoint::Checkpoint;
pub use config::ScrapeConfig;
pub use engine::{RunOutcome, RunSummary, ScrapeEngine, UrlOutcome};
pub use errors::{ScraperError, ScraperResult};
pub use random::{RandomSource, SequenceRandom, StdRandom};
