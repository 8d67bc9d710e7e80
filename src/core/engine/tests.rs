use super::*;
use crate::core::random::SequenceRandom;
use crate::scrapers::{HttpScraper, MockResponse, MockScraper};
use crate::storage::{CsvStorage, MemoryStorage, SinkMode};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product_page(name: &str, brand: &str, price: Option<&str>) -> String {
    let offers = match price {
        Some(price) => format!(r#"{{"@type":"Offer","price":"{}"}}"#, price),
        None => r#"{"@type":"Offer","priceCurrency":"INR"}"#.to_string(),
    };
    format!(
        r#"<html><head><script type="application/ld+json">{{"@type":"Product","name":"{}","brand":{{"name":"{}"}},"offers":{}}}</script></head><body></body></html>"#,
        name, brand, offers
    )
}

fn urls(count: usize) -> Vec<Url> {
    (0..count)
        .map(|i| Url::parse(&format!("https://shop.example/p/{}", i)).unwrap())
        .collect()
}

fn test_config(checkpoint: &Path) -> ScrapeConfig {
    ScrapeConfig::default()
        .with_checkpoint(checkpoint)
        .with_delay(Duration::ZERO, Duration::ZERO)
}

fn engine(scraper: MockScraper, checkpoint: &Path) -> ScrapeEngine {
    ScrapeEngine::new(Box::new(scraper), test_config(checkpoint))
        .unwrap()
        .with_random(Box::new(SequenceRandom::default()))
}

fn pool() -> IdentityPool {
    IdentityPool::from_identities(["Mozilla/5.0 (A)", "Mozilla/5.0 (B)"])
}

fn all_pages(urls: &[Url]) -> MockScraper {
    urls.iter().enumerate().fold(MockScraper::new(), |scraper, (i, url)| {
        scraper.with_response(
            url.as_str(),
            MockResponse::ok(product_page(&format!("Item {}", i), "Brand", Some("100"))),
        )
    })
}

#[tokio::test]
async fn test_mixed_outcomes_write_one_row_and_finish_at_three() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(3);

    let scraper = MockScraper::new()
        .with_response(
            urls[0].as_str(),
            MockResponse::ok(product_page("Kurta", "Avaasa", Some("799"))),
        )
        .with_response(urls[1].as_str(), MockResponse::status(404))
        .with_response(
            urls[2].as_str(),
            MockResponse::ok(product_page("Jeans", "Levis", None)),
        );

    let mut sink = MemoryStorage::new(SinkMode::ResumeAppend);
    let mut engine = engine(scraper, &checkpoint_path);
    let summary = engine.run(&urls, &pool(), &mut sink).await.unwrap();

    let rows = sink.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source_url, "https://shop.example/p/0");
    assert_eq!(rows[0].name, "Kurta");
    assert_eq!(rows[0].brand_name, "Avaasa");
    assert_eq!(rows[0].price, "799");

    assert_eq!(engine.checkpoint().read(), 3);
    assert_eq!(
        summary,
        RunSummary {
            start_index: 0,
            end_index: 3,
            processed: 3,
            records_written: 1,
            fetch_failures: 1,
            outcome: RunOutcome::Completed,
        }
    );

    let stats = engine.stats().get_stats();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.products_written, 1);
}

#[tokio::test]
async fn test_resume_processes_exactly_the_remaining_suffix() {
    let urls = urls(4);

    for start in 0..=urls.len() {
        let temp_dir = TempDir::new().unwrap();
        let checkpoint_path = temp_dir.path().join("checkpoint.txt");
        Checkpoint::new(&checkpoint_path).write(start).unwrap();

        let scraper = all_pages(&urls);
        let mut engine = engine(scraper.clone(), &checkpoint_path);
        let mut sink = MemoryStorage::new(SinkMode::ResumeAppend);
        let summary = engine.run(&urls, &pool(), &mut sink).await.unwrap();

        let expected: Vec<String> = urls[start..].iter().map(|u| u.to_string()).collect();
        assert_eq!(scraper.requested_urls(), expected, "start={}", start);
        assert_eq!(summary.processed, urls.len() - start);
        assert_eq!(engine.checkpoint().read(), urls.len());
    }
}

#[tokio::test]
async fn test_second_run_performs_no_fetches() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(3);
    let mut sink = MemoryStorage::new(SinkMode::ResumeAppend);

    let first = all_pages(&urls);
    engine(first.clone(), &checkpoint_path)
        .run(&urls, &pool(), &mut sink)
        .await
        .unwrap();
    assert_eq!(first.requests().len(), 3);
    assert_eq!(sink.rows().len(), 3);

    let second = all_pages(&urls);
    let summary = engine(second.clone(), &checkpoint_path)
        .run(&urls, &pool(), &mut sink)
        .await
        .unwrap();

    assert!(second.requests().is_empty());
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.end_index, 3);
    // Resumed run keeps rows from the completed one.
    assert_eq!(sink.rows().len(), 3);
}

#[tokio::test]
async fn test_empty_pool_leaves_checkpoint_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(3);
    let scraper = all_pages(&urls);
    let empty = IdentityPool::from_identities(Vec::<String>::new());

    let summary = engine(scraper.clone(), &checkpoint_path)
        .run(&urls, &empty, &mut MemoryStorage::default())
        .await
        .unwrap();

    assert_eq!(summary.outcome, RunOutcome::PoolExhausted);
    assert_eq!(summary.processed, 0);
    assert!(scraper.requests().is_empty());
    assert!(!checkpoint_path.exists());

    Checkpoint::new(&checkpoint_path).write(2).unwrap();
    let summary = engine(scraper.clone(), &checkpoint_path)
        .run(&urls, &empty, &mut MemoryStorage::default())
        .await
        .unwrap();
    assert_eq!(summary.outcome, RunOutcome::PoolExhausted);
    assert_eq!(Checkpoint::new(&checkpoint_path).read(), 2);
}

#[tokio::test]
async fn test_transport_failure_still_advances_checkpoint() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(2);
    let scraper = MockScraper::new()
        .with_response(urls[0].as_str(), MockResponse::TransportError)
        .with_response(
            urls[1].as_str(),
            MockResponse::ok(product_page("Tee", "Puma", Some("499"))),
        );

    let mut sink = MemoryStorage::default();
    let mut engine = engine(scraper.clone(), &checkpoint_path);
    let summary = engine.run(&urls, &pool(), &mut sink).await.unwrap();

    assert_eq!(scraper.requests().len(), 2);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(sink.rows().len(), 1);
    assert_eq!(sink.rows()[0].source_url, urls[1].as_str());
    assert_eq!(engine.checkpoint().read(), 2);
    assert_eq!(engine.stats().get_stats().transport_errors, 1);
}

#[tokio::test]
async fn test_garbage_checkpoint_restarts_from_zero() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    fs::write(&checkpoint_path, "three").unwrap();
    let urls = urls(2);
    let scraper = all_pages(&urls);

    engine(scraper.clone(), &checkpoint_path)
        .run(&urls, &pool(), &mut MemoryStorage::default())
        .await
        .unwrap();

    assert_eq!(scraper.requests().len(), 2);
    assert_eq!(Checkpoint::new(&checkpoint_path).read(), 2);
}

#[tokio::test]
async fn test_checkpoint_past_end_fetches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    Checkpoint::new(&checkpoint_path).write(10).unwrap();
    let urls = urls(2);
    let scraper = all_pages(&urls);

    let summary = engine(scraper.clone(), &checkpoint_path)
        .run(&urls, &pool(), &mut MemoryStorage::default())
        .await
        .unwrap();

    assert!(scraper.requests().is_empty());
    assert_eq!(summary.start_index, 2);
    assert_eq!(Checkpoint::new(&checkpoint_path).read(), 10);
}

#[tokio::test]
async fn test_identity_rotation_and_fixed_headers() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(3);
    let scraper = all_pages(&urls);

    let config = test_config(&checkpoint_path).with_session_cookie("TS01=abc");
    let mut engine = ScrapeEngine::new(Box::new(scraper.clone()), config)
        .unwrap()
        .with_random(Box::new(SequenceRandom::new([1, 0, 1])));
    engine
        .run(&urls, &pool(), &mut MemoryStorage::default())
        .await
        .unwrap();

    let requests = scraper.requests();
    let identities: Vec<_> = requests.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(
        identities,
        vec!["Mozilla/5.0 (B)", "Mozilla/5.0 (A)", "Mozilla/5.0 (B)"]
    );
    for request in &requests {
        assert!(request
            .headers
            .contains(&("Cookie".to_string(), "TS01=abc".to_string())));
        assert!(request
            .headers
            .contains(&("Cache-Control".to_string(), "no-cache".to_string())));
    }
}

#[tokio::test]
async fn test_resumed_run_appends_to_csv_output() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let output_path = temp_dir.path().join("products.csv");
    let urls = urls(3);

    // State left behind by a run killed after its second URL.
    fs::write(
        &output_path,
        "Product URL,name,brand name,price\nhttps://shop.example/p/0,Item 0,Brand,100\n",
    )
    .unwrap();
    Checkpoint::new(&checkpoint_path).write(2).unwrap();

    let mut sink = CsvStorage::new(&output_path, SinkMode::ResumeAppend);
    engine(all_pages(&urls), &checkpoint_path)
        .run(&urls, &pool(), &mut sink)
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&output_path).unwrap(),
        "Product URL,name,brand name,price\n\
         https://shop.example/p/0,Item 0,Brand,100\n\
         https://shop.example/p/2,Item 2,Brand,100\n"
    );
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let output_path = temp_dir.path().join("products.csv");

    Mock::given(method("GET"))
        .and(path("/p/shirt"))
        .and(header("user-agent", "Mozilla/5.0 (A)"))
        .and(header("cookie", "session=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Shirt", "Netplay", Some("899")))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = Url::parse(&mock_server.uri()).unwrap();
    let urls = vec![base.join("/p/shirt").unwrap(), base.join("/p/gone").unwrap()];

    let config = test_config(&checkpoint_path).with_session_cookie("session=1");
    let mut engine = ScrapeEngine::new(Box::new(HttpScraper::new().unwrap()), config)
        .unwrap()
        .with_random(Box::new(SequenceRandom::default()));
    let mut sink = CsvStorage::new(&output_path, SinkMode::ResumeAppend);
    let summary = engine
        .run(&urls, &IdentityPool::from_identities(["Mozilla/5.0 (A)"]), &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(engine.checkpoint().read(), 2);

    let content = fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        content,
        format!(
            "Product URL,name,brand name,price\n{},Shirt,Netplay,899\n",
            urls[0]
        )
    );
}

#[test]
fn test_inverted_delay_rejected_at_construction() {
    let config = ScrapeConfig::default().with_delay(Duration::from_secs(6), Duration::from_secs(3));
    let result = ScrapeEngine::new(Box::new(MockScraper::new()), config);
    assert!(matches!(result, Err(ScraperError::ConfigError(_))));
}

#[tokio::test]
async fn test_control_character_in_cookie_fails_before_any_fetch() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("Shirt", "Netplay", Some("899"))),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&checkpoint_path).with_session_cookie("V=201\n");
    let result = ScrapeEngine::new(Box::new(HttpScraper::new().unwrap()), config);

    assert!(matches!(result, Err(ScraperError::ConfigError(_))));
    assert!(!checkpoint_path.exists());
}

#[tokio::test]
async fn test_invalid_identity_is_never_presented() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(2);
    let scraper = all_pages(&urls);
    let pool = IdentityPool::from_identities(["Bad\u{7}Agent", "Mozilla/5.0 (A)"]);

    let mut engine = ScrapeEngine::new(Box::new(scraper.clone()), test_config(&checkpoint_path))
        .unwrap()
        .with_random(Box::new(SequenceRandom::new([0, 1])));
    let summary = engine
        .run(&urls, &pool, &mut MemoryStorage::default())
        .await
        .unwrap();

    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.fetch_failures, 0);
    assert!(scraper
        .requests()
        .iter()
        .all(|r| r.identity == "Mozilla/5.0 (A)"));
}

#[tokio::test]
async fn test_pool_of_only_invalid_identities_is_exhausted() {
    let temp_dir = TempDir::new().unwrap();
    let checkpoint_path = temp_dir.path().join("checkpoint.txt");
    let urls = urls(2);
    let scraper = all_pages(&urls);
    let pool = IdentityPool::from_identities(["Bad\nAgent", "Other\u{1}Agent"]);

    let mut engine = engine(scraper.clone(), &checkpoint_path);
    let summary = engine
        .run(&urls, &pool, &mut MemoryStorage::default())
        .await
        .unwrap();

    assert_eq!(summary.outcome, RunOutcome::PoolExhausted);
    assert!(scraper.requests().is_empty());
    assert!(!checkpoint_path.exists());
}
