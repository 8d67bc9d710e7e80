use clap::Parser;
use log::{error, info};

use jsonld_scraper::cli::Cli;
use jsonld_scraper::input::load_urls;
use jsonld_scraper::scrapers::HttpScraper;
use jsonld_scraper::{CsvStorage, IdentityPool, RunOutcome, ScrapeEngine, ScraperResult};

#[tokio::main]
async fn main() -> ScraperResult<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(cli.log_level)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .init();

    let config = cli.build_config();
    let urls_path = config.input_path.clone();
    let url_column = config.url_column.clone();
    let identity_path = config.identity_path.clone();
    let output_path = config.output_path.clone();
    let sink_mode = config.sink_mode;

    // Startup failures abort before any URL is touched; the engine validates the
    // configuration, headers included.
    let scraper = HttpScraper::new()?.with_timeout(config.request_timeout)?;
    let mut engine = ScrapeEngine::new(Box::new(scraper), config)?;

    let urls = load_urls(&urls_path, &url_column)?;
    let pool = IdentityPool::load(&identity_path)?;
    if pool.is_empty() {
        error!("No user agents found in {}", identity_path.display());
    }

    let mut sink = CsvStorage::new(&output_path, sink_mode);
    let summary = engine.run(&urls, &pool, &mut sink).await?;

    if summary.outcome == RunOutcome::PoolExhausted {
        info!("Stopped early: identity pool exhausted");
    }
    engine.stats().print_summary();
    Ok(())
}
